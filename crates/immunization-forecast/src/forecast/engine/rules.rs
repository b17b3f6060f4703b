use chrono::{Months, NaiveDate};

use super::super::dates::whole_weeks_between;
use super::super::decision::{Action, Decision, Reason};
use super::super::domain::ShotRecord;
use super::super::series::VaccineSeries;
use super::ForecastError;

pub(crate) const IMMUNOGLOBULIN_CVX: u16 = 86;
pub(crate) const PNEUMOCOCCAL_CVX_CODES: [u16; 4] = [133, 100, 152, 109];

const PCV_MINIMUM_INTERVAL_WEEKS: i64 = 8;
const IMMUNOGLOBULIN_LOOKBACK_MONTHS: u32 = 3;

// Reason prefixes on baseline text that rules key on.
const HIGH_RISK: &str = "HIGH_RISK";
const DUE_NOW: &str = "DUE_NOW";
const COMPLETE: &str = "COMPLETE";
const MENB_ENGINE_CONDITIONS: [&str; 3] =
    ["HIGH_RISK", "CLINICAL_PATIENT_DISCRETION", "TOO_OLD_HIGH_RISK"];

fn conditional_high_risk(baseline: &Decision) -> bool {
    baseline.is(&Action::Conditional, HIGH_RISK)
}

pub(crate) fn hep_a(baseline: &Decision, age: i32) -> Option<Decision> {
    if !conditional_high_risk(baseline) {
        return None;
    }

    if age <= 18 {
        Some(Decision::new(Action::Recommended, Reason::Age))
    } else {
        Some(Decision::new(Action::Conditional, Reason::IfHighRisk))
    }
}

/// Shared by Hib and PCV13: resolve a conditional high-risk baseline against the patient's codes.
pub(crate) fn conditional_by_risk(baseline: &Decision, high_risk: bool) -> Option<Decision> {
    if !conditional_high_risk(baseline) {
        return None;
    }

    if high_risk {
        Some(Decision::new(Action::RecommendedCmc, Reason::HighRisk))
    } else {
        Some(Decision::new(Action::NotRecommended, Reason::NotHighRisk))
    }
}

pub(crate) fn meningococcal(baseline: &Decision, high_risk: bool, age: i32) -> Option<Decision> {
    if high_risk {
        let action = if age < 11 {
            Action::RecommendedCmc
        } else {
            Action::RecommendedCmcAge
        };
        return Some(Decision::new(action, Reason::HighRisk));
    }

    conditional_high_risk(baseline)
        .then(|| Decision::new(Action::Conditional, Reason::NotHighRisk))
}

pub(crate) fn hpv(high_risk: bool, age: i32) -> Option<Decision> {
    (age >= 9 && high_risk).then(|| Decision::new(Action::NeedsThreeDoses, Reason::Cmc))
}

/// Live vaccines are deferred when immunoglobulin was given in the three months up to the audit date.
pub(crate) fn immunoglobulin(
    series: &VaccineSeries,
    baseline: &Decision,
    history: &[ShotRecord],
    audit_date: NaiveDate,
) -> Result<Option<Decision>, ForecastError> {
    if !series.is_immunoglobulin_sensitive() || !baseline.is(&Action::Recommended, DUE_NOW) {
        return Ok(None);
    }

    let window_start = audit_date
        .checked_sub_months(Months::new(IMMUNOGLOBULIN_LOOKBACK_MONTHS))
        .ok_or_else(|| ForecastError::DateOutOfRange {
            series: series.label().to_string(),
            detail: format!("cannot look back three months from {audit_date}"),
        })?;

    let recent_dose = history.iter().any(|shot| {
        shot.cvx_code == Some(IMMUNOGLOBULIN_CVX)
            && shot.shot_date >= window_start
            && shot.shot_date <= audit_date
    });

    Ok(recent_dose.then(|| Decision::new(Action::NotRecommended, Reason::IgInterval)))
}

/// Latest valid pneumococcal dose that satisfies the PCV13 prerequisite for PPSV.
pub(crate) fn latest_pneumococcal_dose(history: &[ShotRecord]) -> Option<NaiveDate> {
    history
        .iter()
        .filter(|shot| shot.is_valid && shot.has_cvx(&PNEUMOCOCCAL_CVX_CODES))
        .map(|shot| shot.shot_date)
        .max()
}

pub(crate) fn ppsv(
    high_risk: bool,
    age: i32,
    pcv: Option<&Decision>,
    last_pneumococcal: Option<NaiveDate>,
    audit_date: NaiveDate,
) -> Option<Decision> {
    if !high_risk {
        return None;
    }

    match age {
        age if age < 2 => Some(Decision::new(Action::NotRecommended, Reason::Age)),
        19..=64 => Some(Decision::new(Action::Conditional, Reason::IfHighRisk)),
        age if age >= 65 => None,
        _ => ppsv_after_pcv(pcv?, last_pneumococcal, audit_date),
    }
}

fn ppsv_after_pcv(
    pcv: &Decision,
    last_pneumococcal: Option<NaiveDate>,
    audit_date: NaiveDate,
) -> Option<Decision> {
    let reason = if pcv.action.is_future_recommended() {
        Reason::Pcv13DueFuture
    } else if pcv.action.is_recommended() {
        Reason::AfterPcv13
    } else if conditional_high_risk(pcv) {
        Reason::MayNeedPcv13
    } else if pcv.is(&Action::NotRecommended, COMPLETE) {
        let reason = match last_pneumococcal {
            Some(last)
                if whole_weeks_between(last, audit_date) < PCV_MINIMUM_INTERVAL_WEEKS =>
            {
                Reason::GiveAfterMinimumInterval
            }
            _ => Reason::PcvComplete,
        };
        return Some(Decision::new(Action::RecommendedCmc, reason));
    } else {
        return None;
    };

    Some(Decision::new(Action::FutureRecommendedCmc, reason))
}

/// Refinement for an engine-computed Meningococcal B entry.
pub(crate) fn menb_engine(baseline: &Decision, high_risk: bool) -> Option<Decision> {
    let conditional = MENB_ENGINE_CONDITIONS
        .iter()
        .any(|reason| baseline.is(&Action::Conditional, reason));

    (conditional && high_risk)
        .then(|| Decision::new(Action::RecommendedCmcAge, Reason::HighRisk))
}
