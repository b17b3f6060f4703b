mod config;
mod influenza;
mod menb;
mod rules;

pub use config::ForecastPolicy;
pub use influenza::{forecast_influenza, FluStatus, InfluenzaForecast};
pub use menb::{forecast_menb, menb_status_text, MENB_BRAND_A_CVX, MENB_BRAND_B_CVX};

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::decision::Decision;
use super::domain::{FluSeasonWindow, ForecastEntry, RiskProfile, ShotRecord};
use super::reference::ReferenceCodeSet;
use super::risk::{Condition, RiskClassifier};
use super::series::VaccineSeries;
use super::source::CdsSchedule;

#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("date out of range while evaluating {series}: {detail}")]
    DateOutOfRange { series: String, detail: String },
    #[error("invalid risk profile: {detail}")]
    InvalidProfile { detail: String },
}

/// One change the engine made to a series, kept for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedOverride {
    pub series: String,
    /// `None` when the entry was added rather than rewritten.
    pub before: Option<Decision>,
    pub after: Decision,
}

/// Final forecast list in baseline order, with appended series last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastOutcome {
    pub forecasts: Vec<ForecastEntry>,
    pub overrides: Vec<AppliedOverride>,
}

impl ForecastOutcome {
    pub fn entry(&self, series: &VaccineSeries) -> Option<&ForecastEntry> {
        self.forecasts
            .iter()
            .find(|entry| entry.series_id() == *series)
    }
}

/// Applies institution override rules on top of an engine baseline.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    classifier: RiskClassifier,
    policy: ForecastPolicy,
}

impl ForecastEngine {
    pub fn new(codes: Arc<ReferenceCodeSet>, policy: ForecastPolicy) -> Self {
        Self {
            classifier: RiskClassifier::new(codes),
            policy,
        }
    }

    pub fn forecast(
        &self,
        profile: &RiskProfile,
        schedule: &CdsSchedule,
    ) -> Result<ForecastOutcome, ForecastError> {
        let baseline = schedule.baseline();
        let window = FluSeasonWindow::containing(profile.audit_date());
        self.apply(profile, &baseline, &schedule.history, &window)
    }

    /// Evaluate every rule against a copy of `baseline`; nothing is returned unless all succeed.
    pub fn apply(
        &self,
        profile: &RiskProfile,
        baseline: &[ForecastEntry],
        history: &[ShotRecord],
        window: &FluSeasonWindow,
    ) -> Result<ForecastOutcome, ForecastError> {
        let age = profile.age_in_years();
        let audit_date = profile.audit_date();
        let high_risk = |condition| self.classifier.is_high_risk(condition, profile);

        let mut set = ForecastSet::from_baseline(baseline);

        set.apply(&VaccineSeries::HepA, |_, baseline| {
            Ok(rules::hep_a(baseline, age))
        })?;
        set.apply(&VaccineSeries::Hib, |_, baseline| {
            Ok(rules::conditional_by_risk(baseline, high_risk(Condition::Hib)))
        })?;
        set.apply(&VaccineSeries::Meningococcal, |_, baseline| {
            Ok(rules::meningococcal(
                baseline,
                high_risk(Condition::Meningococcal),
                age,
            ))
        })?;
        set.apply(&VaccineSeries::Hpv, |_, _| {
            Ok(rules::hpv(high_risk(Condition::Hpv), age))
        })?;

        if self.policy.immunoglobulin_interval_rule {
            for series in [
                VaccineSeries::Rotavirus,
                VaccineSeries::Mmr,
                VaccineSeries::Varicella,
            ] {
                set.apply(&series, |series, baseline| {
                    rules::immunoglobulin(series, baseline, history, audit_date)
                })?;
            }
        }

        set.apply(&VaccineSeries::Pcv, |_, baseline| {
            Ok(rules::conditional_by_risk(baseline, high_risk(Condition::Pcv13)))
        })?;

        let pcv = set.decision(&VaccineSeries::Pcv).cloned();
        let last_pneumococcal = rules::latest_pneumococcal_dose(history);
        set.apply(&VaccineSeries::Ppsv, |_, _| {
            Ok(rules::ppsv(
                high_risk(Condition::Ppsv),
                age,
                pcv.as_ref(),
                last_pneumococcal,
                audit_date,
            ))
        })?;

        if set.contains(&VaccineSeries::Influenza) {
            let flu = forecast_influenza(history, profile, window)?;
            set.overwrite(
                &VaccineSeries::Influenza,
                flu.decision(),
                flu.status.status_text(),
                flu.due_date,
            );
        }

        if self.policy.engine_supplies_menb {
            set.apply(&VaccineSeries::MeningococcalB, |_, baseline| {
                Ok(rules::menb_engine(baseline, high_risk(Condition::MenB)))
            })?;
        } else {
            let decision = forecast_menb(history, profile, high_risk(Condition::MenB));
            set.append(menb::menb_entry(decision));
        }

        Ok(set.finish())
    }
}

/// Working copy of the forecast list, indexed by series.
struct ForecastSet {
    entries: Vec<ForecastEntry>,
    index: HashMap<VaccineSeries, Vec<usize>>,
    applied: Vec<AppliedOverride>,
}

impl ForecastSet {
    fn from_baseline(baseline: &[ForecastEntry]) -> Self {
        let mut set = Self {
            entries: Vec::with_capacity(baseline.len() + 1),
            index: HashMap::new(),
            applied: Vec::new(),
        };
        for entry in baseline {
            set.push(entry.clone());
        }
        set
    }

    fn push(&mut self, entry: ForecastEntry) {
        self.index
            .entry(entry.series_id())
            .or_default()
            .push(self.entries.len());
        self.entries.push(entry);
    }

    fn positions(&self, series: &VaccineSeries) -> Vec<usize> {
        self.index.get(series).cloned().unwrap_or_default()
    }

    fn contains(&self, series: &VaccineSeries) -> bool {
        self.index.contains_key(series)
    }

    fn decision(&self, series: &VaccineSeries) -> Option<&Decision> {
        self.index
            .get(series)
            .and_then(|positions| positions.first())
            .map(|position| &self.entries[*position].decision)
    }

    fn apply<F>(&mut self, series: &VaccineSeries, mut rule: F) -> Result<(), ForecastError>
    where
        F: FnMut(&VaccineSeries, &Decision) -> Result<Option<Decision>, ForecastError>,
    {
        for position in self.positions(series) {
            let Some(after) = rule(series, &self.entries[position].decision)? else {
                continue;
            };
            let entry = &mut self.entries[position];
            if entry.decision == after {
                continue;
            }

            let before = std::mem::replace(&mut entry.decision, after.clone());
            debug!(
                series = %entry.series,
                before = %before,
                after = %after,
                "applied forecast override"
            );
            self.applied.push(AppliedOverride {
                series: entry.series.clone(),
                before: Some(before),
                after,
            });
        }
        Ok(())
    }

    /// Replace decision, status and date criteria outright.
    fn overwrite(
        &mut self,
        series: &VaccineSeries,
        decision: Decision,
        status: &str,
        due_date: Option<NaiveDate>,
    ) {
        for position in self.positions(series) {
            let entry = &mut self.entries[position];
            let before = std::mem::replace(&mut entry.decision, decision.clone());
            entry.forecast_status = status.to_string();
            entry.date_criteria = due_date.into_iter().collect();

            debug!(
                series = %entry.series,
                before = %before,
                after = %decision,
                "replaced engine forecast"
            );
            if before != decision {
                self.applied.push(AppliedOverride {
                    series: entry.series.clone(),
                    before: Some(before),
                    after: decision.clone(),
                });
            }
        }
    }

    fn append(&mut self, entry: ForecastEntry) {
        debug!(series = %entry.series, decision = %entry.decision, "added forecast series");
        self.applied.push(AppliedOverride {
            series: entry.series.clone(),
            before: None,
            after: entry.decision.clone(),
        });
        self.push(entry);
    }

    fn finish(self) -> ForecastOutcome {
        ForecastOutcome {
            forecasts: self.entries,
            overrides: self.applied,
        }
    }
}
