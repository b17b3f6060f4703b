use chrono::{Days, Months, NaiveDate};
use serde::Serialize;

use super::super::dates::days_between;
use super::super::decision::{Action, Decision, Reason};
use super::super::domain::{FluSeasonWindow, RiskProfile, ShotRecord};
use super::super::series::VaccineSeries;
use super::ForecastError;

const MINIMUM_DOSE_INTERVAL_DAYS: i64 = 24;
const REVISIT_AFTER_DAYS: u64 = 28;
const ELIGIBLE_AGE_MONTHS: i32 = 6;
const SINGLE_DOSE_AGE_MONTHS: i32 = 108;

/// Seasonal influenza status before it is mapped onto a forecast decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FluStatus {
    /// Season requirement met.
    Complete,
    /// Needs a dose now.
    Due,
    /// Needs a dose, but the last one was too recent.
    NotYetDue,
    /// Younger than six months.
    NotEligible,
}

impl FluStatus {
    pub fn decision(self) -> Decision {
        match self {
            Self::Complete => Decision::new(Action::NotRecommended, Reason::Complete),
            Self::Due => Decision::new(Action::Recommended, Reason::DueNow),
            Self::NotYetDue | Self::NotEligible => {
                Decision::new(Action::FutureRecommended, Reason::DueInFuture)
            }
        }
    }

    pub const fn status_text(self) -> &'static str {
        match self {
            Self::Complete => "Not Recommended",
            Self::Due => "Recommended",
            Self::NotYetDue | Self::NotEligible => "Future Recommendation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfluenzaForecast {
    pub status: FluStatus,
    pub prior_season_doses: usize,
    pub current_season_doses: usize,
    pub due_date: Option<NaiveDate>,
}

impl InfluenzaForecast {
    pub fn decision(&self) -> Decision {
        self.status.decision()
    }
}

/// Compute the influenza forecast from every influenza-annotated dose.
pub fn forecast_influenza(
    history: &[ShotRecord],
    profile: &RiskProfile,
    window: &FluSeasonWindow,
) -> Result<InfluenzaForecast, ForecastError> {
    let mut dates: Vec<NaiveDate> = history
        .iter()
        .filter(|shot| shot.in_series(&VaccineSeries::Influenza))
        .map(|shot| shot.shot_date)
        .collect();
    dates.sort();

    let mut kept: Vec<NaiveDate> = Vec::new();
    for date in dates {
        let spaced = kept
            .last()
            .map(|last| days_between(*last, date) >= MINIMUM_DOSE_INTERVAL_DAYS)
            .unwrap_or(true);
        if spaced {
            kept.push(date);
        }
    }

    // A dose on the cutoff date itself counts toward neither season.
    let prior_season_doses = kept.iter().filter(|date| **date < window.cutoff_date).count();
    let current_season_doses = kept.iter().filter(|date| **date > window.cutoff_date).count();

    let age_months = profile.age_in_months();
    let mut status = if age_months < ELIGIBLE_AGE_MONTHS {
        FluStatus::NotEligible
    } else if age_months < SINGLE_DOSE_AGE_MONTHS {
        let required = if prior_season_doses >= 2 { 1 } else { 2 };
        if current_season_doses >= required {
            FluStatus::Complete
        } else {
            FluStatus::Due
        }
    } else if current_season_doses >= 1 {
        FluStatus::Complete
    } else {
        FluStatus::Due
    };

    let mut due_date = None;
    match status {
        FluStatus::Due => {
            if let Some(last) = kept.last().copied() {
                if days_between(last, profile.audit_date()) < MINIMUM_DOSE_INTERVAL_DAYS {
                    status = FluStatus::NotYetDue;
                    due_date = Some(last.checked_add_days(Days::new(REVISIT_AFTER_DAYS)).ok_or_else(
                        || out_of_range(format!("cannot add {REVISIT_AFTER_DAYS} days to {last}")),
                    )?);
                }
            }
        }
        FluStatus::NotEligible => {
            let dob = profile.date_of_birth();
            due_date = Some(
                dob.checked_add_months(Months::new(ELIGIBLE_AGE_MONTHS as u32))
                    .ok_or_else(|| out_of_range(format!("cannot add six months to {dob}")))?,
            );
        }
        FluStatus::Complete | FluStatus::NotYetDue => {}
    }

    Ok(InfluenzaForecast {
        status,
        prior_season_doses,
        current_season_doses,
        due_date,
    })
}

fn out_of_range(detail: String) -> ForecastError {
    ForecastError::DateOutOfRange {
        series: VaccineSeries::Influenza.label().to_string(),
        detail,
    }
}
