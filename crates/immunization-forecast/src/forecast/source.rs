use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::decision::{Action, Decision, Reason};
use super::domain::{ForecastEntry, Gender, SeriesAnnotation, ShotRecord};
use super::series::format_series_name;

/// Failure reaching or reading the external decision support engine.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleSourceError {
    #[error("no schedule available for patient {0}")]
    NotFound(String),
    #[error("failed to read schedule: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed schedule: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Seam for the external engine that computes the baseline schedule and dose validity.
pub trait ScheduleSource: Send + Sync {
    fn schedule(
        &self,
        patient_id: &str,
        audit_date: NaiveDate,
    ) -> Result<CdsSchedule, ScheduleSourceError>;
}

/// One series as the engine forecast it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdsRecommendation {
    pub series: String,
    pub recommendation_code: String,
    #[serde(default)]
    pub interpretation_code: String,
    #[serde(default)]
    pub forecast_status: String,
    #[serde(default)]
    pub proposed_date: Option<NaiveDate>,
}

impl CdsRecommendation {
    pub fn to_entry(&self) -> ForecastEntry {
        let decision = Decision::new(
            Action::parse(&self.recommendation_code),
            Reason::parse(&self.interpretation_code),
        );
        let mut entry = ForecastEntry::new(
            format_series_name(&self.series),
            self.forecast_status.clone(),
            decision,
        );
        entry.date_criteria.extend(self.proposed_date);
        entry
    }
}

/// A dose as the engine exports it: series and reasons are comma-joined, matched by position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CdsShot {
    pub immunization_id: String,
    #[serde(default)]
    pub cvx_code: Option<u16>,
    pub shot_date: NaiveDate,
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub reason_codes: String,
    pub is_valid: bool,
    #[serde(default)]
    pub dose_sequence: u32,
}

impl From<CdsShot> for ShotRecord {
    fn from(shot: CdsShot) -> Self {
        let annotations = pair_annotations(&shot.immunization_id, &shot.series, &shot.reason_codes);
        Self {
            immunization_id: shot.immunization_id,
            cvx_code: shot.cvx_code,
            shot_date: shot.shot_date,
            annotations,
            is_valid: shot.is_valid,
            dose_sequence: shot.dose_sequence,
        }
    }
}

/// Pair each series token with the reason at the same position.
///
/// Missing reasons become `None` and surplus reasons are dropped.
pub fn pair_annotations(
    immunization_id: &str,
    series: &str,
    reasons: &str,
) -> Vec<SeriesAnnotation> {
    let series_tokens = tokens(series);
    let reason_tokens = tokens(reasons);

    if !reason_tokens.is_empty() && reason_tokens.len() != series_tokens.len() {
        warn!(
            immunization_id,
            series = series_tokens.len(),
            reasons = reason_tokens.len(),
            "series and reason counts differ"
        );
    }

    series_tokens
        .iter()
        .enumerate()
        .map(|(position, series)| SeriesAnnotation {
            series: series.to_string(),
            reason: reason_tokens
                .get(position)
                .filter(|reason| !reason.is_empty())
                .map(|reason| reason.to_string()),
        })
        .collect()
}

fn tokens(raw: &str) -> Vec<&str> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::trim).collect()
}

/// Everything the engine returns for one patient and audit date.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CdsSchedule {
    pub date_of_birth: NaiveDate,
    #[serde(default = "unknown_gender")]
    pub gender: Gender,
    #[serde(default)]
    pub recommendations: Vec<CdsRecommendation>,
    #[serde(default, deserialize_with = "deserialize_history")]
    pub history: Vec<ShotRecord>,
}

impl CdsSchedule {
    /// Baseline forecast entries in engine order.
    pub fn baseline(&self) -> Vec<ForecastEntry> {
        self.recommendations
            .iter()
            .map(CdsRecommendation::to_entry)
            .collect()
    }
}

fn unknown_gender() -> Gender {
    Gender::Unknown
}

fn deserialize_history<'de, D>(deserializer: D) -> Result<Vec<ShotRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let shots = Vec::<CdsShot>::deserialize(deserializer)?;
    Ok(shots.into_iter().map(ShotRecord::from).collect())
}
