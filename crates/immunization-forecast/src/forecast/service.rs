use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{parse_audit_date, AuditDateError, RiskProfile};
use super::engine::{ForecastEngine, ForecastError, ForecastOutcome};
use super::history::{assemble_immunizations, merge_shot_history, ImmunizationRecord, ImmunizationRow};
use super::source::{ScheduleSource, ScheduleSourceError};

/// Caller-supplied request parameters, still in their raw string form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    /// `YYYYMMDD`; defaults to today.
    pub audit_date: Option<String>,
    /// Pipe-delimited ICD9 codes.
    pub icd9: Option<String>,
    /// Pipe-delimited ICD10 codes.
    pub icd10: Option<String>,
}

/// Service composing the schedule source with the override engine.
pub struct ForecastService<S> {
    source: Arc<S>,
    engine: Arc<ForecastEngine>,
}

impl<S> ForecastService<S>
where
    S: ScheduleSource + 'static,
{
    pub fn new(source: Arc<S>, engine: Arc<ForecastEngine>) -> Self {
        Self { source, engine }
    }

    /// Fetch the patient's baseline schedule and apply every override.
    pub fn forecast(
        &self,
        patient_id: &str,
        params: &RequestParams,
        today: NaiveDate,
    ) -> Result<ForecastOutcome, ForecastServiceError> {
        let audit_date = parse_audit_date(params.audit_date.as_deref(), today)?;
        let schedule = self.source.schedule(patient_id, audit_date)?;

        let profile = RiskProfile::from_request(
            params.icd9.as_deref(),
            params.icd10.as_deref(),
            schedule.date_of_birth,
            schedule.gender,
            audit_date,
        )?;

        let outcome = self.engine.forecast(&profile, &schedule)?;
        info!(
            patient_id,
            %audit_date,
            series = outcome.forecasts.len(),
            overrides = outcome.overrides.len(),
            "forecast complete"
        );
        Ok(outcome)
    }

    /// Merge engine dose annotations onto the patient's raw immunization rows.
    pub fn shot_history<I>(
        &self,
        patient_id: &str,
        audit_date: NaiveDate,
        rows: I,
    ) -> Result<Vec<ImmunizationRecord>, ForecastServiceError>
    where
        I: IntoIterator<Item = ImmunizationRow>,
    {
        let schedule = self.source.schedule(patient_id, audit_date)?;
        let records = merge_shot_history(assemble_immunizations(rows), &schedule.history);
        info!(
            patient_id,
            %audit_date,
            immunizations = records.len(),
            "shot history merged"
        );
        Ok(records)
    }
}

/// Error raised by the forecast service.
#[derive(Debug, thiserror::Error)]
pub enum ForecastServiceError {
    #[error(transparent)]
    AuditDate(#[from] AuditDateError),
    #[error(transparent)]
    Source(#[from] ScheduleSourceError),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
}
