//! Per-patient vaccine forecasting: risk classification, series overrides, the MenB and
//! influenza algorithms, and the shot-history merge.

pub mod dates;
mod decision;
mod domain;
mod engine;
pub mod history;
mod reference;
mod risk;
mod series;
mod service;
mod source;

#[cfg(test)]
mod tests;

pub use decision::{Action, Decision, Reason};
pub use domain::{
    parse_audit_date, split_codes, AuditDateError, FluSeasonWindow, ForecastEntry, Gender,
    RiskProfile, SeriesAnnotation, ShotRecord,
};
pub use engine::{
    forecast_influenza, forecast_menb, menb_status_text, AppliedOverride, FluStatus,
    ForecastEngine, ForecastError, ForecastOutcome, ForecastPolicy, InfluenzaForecast,
    MENB_BRAND_A_CVX, MENB_BRAND_B_CVX,
};
pub use history::{
    antibody_series, assemble_immunizations, merge_shot_history, AdministrationStatus,
    DoseStatus, ImmunizationRecord, ImmunizationRow, ProtocolEntry, CIR_RULES_DESCRIPTION,
};
pub use reference::{ReferenceCodeImporter, ReferenceCodeSet, ReferenceDataError};
pub use risk::{CodingSystem, Condition, RiskClassifier};
pub use series::{fallback_series_name, format_series_name, VaccineSeries, MENB_CVX_CODES};
pub use service::{ForecastService, ForecastServiceError, RequestParams};
pub use source::{
    pair_annotations, CdsRecommendation, CdsSchedule, CdsShot, ScheduleSource,
    ScheduleSourceError,
};
