use chrono::NaiveDate;

use super::super::dates::days_between;
use super::super::decision::{Action, Decision, Reason};
use super::super::domain::{ForecastEntry, RiskProfile, ShotRecord};
use super::super::series::VaccineSeries;

/// Two-dose brand; any dose of it in the series is not supported.
pub const MENB_BRAND_A_CVX: u16 = 162;
pub const MENB_BRAND_B_CVX: u16 = 163;

const MINIMUM_DOSE_INTERVAL_DAYS: i64 = 24;

/// Where a patient stands in the Meningococcal B series, read from valid doses only.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MenBDoses {
    first: Option<NaiveDate>,
    second: Option<NaiveDate>,
    total: usize,
    /// Any brand A dose on record; the series cannot mix brands.
    brand_a: bool,
}

impl MenBDoses {
    fn from_history(history: &[ShotRecord]) -> Self {
        let mut doses: Vec<(NaiveDate, u16)> = history
            .iter()
            .filter(|shot| shot.is_valid)
            .filter_map(|shot| match shot.cvx_code {
                Some(code @ (MENB_BRAND_A_CVX | MENB_BRAND_B_CVX)) => Some((shot.shot_date, code)),
                _ => None,
            })
            .collect();
        doses.sort();

        let first = doses.first().map(|(date, _)| *date);
        // The latest dose far enough from the first stands as the second.
        let second = first.and_then(|first_date| {
            doses
                .iter()
                .skip(1)
                .map(|(date, _)| *date)
                .filter(|date| days_between(first_date, *date) >= MINIMUM_DOSE_INTERVAL_DAYS)
                .last()
        });

        Self {
            first,
            second,
            total: doses.len(),
            brand_a: doses.iter().any(|(_, code)| *code == MENB_BRAND_A_CVX),
        }
    }
}

/// Compute the Meningococcal B decision from raw shot history, ignoring any engine baseline.
pub fn forecast_menb(history: &[ShotRecord], profile: &RiskProfile, high_risk: bool) -> Decision {
    let doses = MenBDoses::from_history(history);
    let age = profile.age_in_years();

    let Some(first_date) = doses.first else {
        return unvaccinated(age, high_risk);
    };

    if doses.brand_a {
        return Decision::new(Action::NotSupported, Reason::OtherVaccine);
    }

    if doses.second.is_some() {
        return Decision::new(Action::NotRecommended, Reason::Complete);
    }

    if doses.total > 1 {
        return Decision::new(Action::Recommended, Reason::DueNowInvalid);
    }

    if days_between(first_date, profile.audit_date()) >= MINIMUM_DOSE_INTERVAL_DAYS {
        Decision::new(Action::Recommended, Reason::DueNow)
    } else {
        Decision::new(Action::FutureRecommended, Reason::DueInFuture)
    }
}

fn unvaccinated(age: i32, high_risk: bool) -> Decision {
    if high_risk {
        return if age < 10 {
            Decision::new(Action::FutureRecommended, Reason::HighRisk)
        } else {
            Decision::new(Action::RecommendedCmc, Reason::HighRisk)
        };
    }

    match age {
        age if age < 10 => Decision::new(Action::NotRecommended, Reason::Age),
        11..=15 => Decision::new(Action::NotRecommended, Reason::NotHighRisk),
        17..=23 => Decision::new(Action::Recommended, Reason::PermissiveRec),
        _ => Decision::new(Action::NotRecommended, Reason::NotHighRisk),
    }
}

pub fn menb_status_text(decision: &Decision) -> &'static str {
    if decision.action.is_future_recommended() {
        "Future Recommendation"
    } else if decision.action.is_recommended() {
        "Due Now"
    } else if decision.action.is_not_recommended() {
        "Not Recommended"
    } else {
        ""
    }
}

pub(crate) fn menb_entry(decision: Decision) -> ForecastEntry {
    let status = menb_status_text(&decision);
    ForecastEntry::new(VaccineSeries::MenB.label(), status, decision)
}
