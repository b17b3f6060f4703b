use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::Args;
use immunization_forecast::config::AppConfig;
use immunization_forecast::error::AppError;
use immunization_forecast::forecast::{
    parse_audit_date, ForecastEngine, ForecastService, ImmunizationRow, ReferenceCodeSet,
    RequestParams,
};
use immunization_forecast::telemetry;
use serde::Serialize;

use crate::infra::{load_reference_codes, read_json, JsonScheduleSource};

#[derive(Args, Debug)]
pub(crate) struct ForecastArgs {
    /// Engine schedule export (JSON) for the patient
    #[arg(long)]
    pub(crate) schedule: PathBuf,
    /// Reference code CSV; defaults to FORECAST_CODE_SETS
    #[arg(long)]
    pub(crate) codes: Option<PathBuf>,
    /// Audit date as YYYYMMDD (defaults to today)
    #[arg(long)]
    pub(crate) audit_date: Option<String>,
    /// Pipe-delimited ICD9 codes
    #[arg(long)]
    pub(crate) icd9: Option<String>,
    /// Pipe-delimited ICD10 codes
    #[arg(long)]
    pub(crate) icd10: Option<String>,
    /// Patient identifier used in logs
    #[arg(long, default_value = "cli")]
    pub(crate) patient: String,
}

#[derive(Args, Debug)]
pub(crate) struct HistoryArgs {
    /// Engine schedule export (JSON) carrying dose annotations
    #[arg(long)]
    pub(crate) schedule: PathBuf,
    /// Raw immunization rows (JSON array)
    #[arg(long)]
    pub(crate) immunizations: PathBuf,
    /// Audit date as YYYYMMDD (defaults to today)
    #[arg(long)]
    pub(crate) audit_date: Option<String>,
    /// Patient identifier used in logs
    #[arg(long, default_value = "cli")]
    pub(crate) patient: String,
}

fn bootstrap() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn run_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let config = bootstrap()?;
    let codes = load_reference_codes(args.codes.as_deref(), &config)?;
    let engine = ForecastEngine::new(codes, config.policy);
    let service = ForecastService::new(
        Arc::new(JsonScheduleSource::new(args.schedule)),
        Arc::new(engine),
    );

    let params = RequestParams {
        audit_date: args.audit_date,
        icd9: args.icd9,
        icd10: args.icd10,
    };
    let outcome = service.forecast(&args.patient, &params, Local::now().date_naive())?;
    print_json(&outcome)
}

pub(crate) fn run_history(args: HistoryArgs) -> Result<(), AppError> {
    let audit_date = parse_audit_date(args.audit_date.as_deref(), Local::now().date_naive())?;
    let config = bootstrap()?;
    let rows: Vec<ImmunizationRow> = read_json(&args.immunizations)?;
    // Annotation merging never consults risk codes.
    let engine = ForecastEngine::new(Arc::new(ReferenceCodeSet::empty()), config.policy);
    let service = ForecastService::new(
        Arc::new(JsonScheduleSource::new(args.schedule)),
        Arc::new(engine),
    );

    let records = service.shot_history(&args.patient, audit_date, rows)?;
    print_json(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use immunization_forecast::forecast::AuditDateError;

    fn history_args(audit_date: &str) -> HistoryArgs {
        HistoryArgs {
            schedule: PathBuf::from("schedule.json"),
            immunizations: PathBuf::from("immunizations.json"),
            audit_date: Some(audit_date.to_string()),
            patient: "cli".to_string(),
        }
    }

    #[test]
    fn history_audit_date_uses_compact_format() {
        match run_history(history_args("2023-11-01")) {
            Err(AppError::AuditDate(AuditDateError::Format(raw))) => assert_eq!(raw, "2023-11-01"),
            other => panic!("expected audit date format error, got {other:?}"),
        }
    }

    #[test]
    fn history_rejects_future_audit_dates() {
        match run_history(history_args("99991231")) {
            Err(AppError::AuditDate(AuditDateError::InFuture { .. })) => {}
            other => panic!("expected future audit date error, got {other:?}"),
        }
    }
}
