use crate::config::ConfigError;
use crate::forecast::{
    AuditDateError, ForecastError, ForecastServiceError, ReferenceDataError, ScheduleSourceError,
};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    ReferenceData(ReferenceDataError),
    AuditDate(AuditDateError),
    Source(ScheduleSourceError),
    Forecast(ForecastError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "json error: {}", err),
            AppError::ReferenceData(err) => write!(f, "reference data error: {}", err),
            AppError::AuditDate(err) => write!(f, "audit date error: {}", err),
            AppError::Source(err) => write!(f, "schedule source error: {}", err),
            AppError::Forecast(err) => write!(f, "forecast error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::ReferenceData(err) => Some(err),
            AppError::AuditDate(err) => Some(err),
            AppError::Source(err) => Some(err),
            AppError::Forecast(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ReferenceDataError> for AppError {
    fn from(value: ReferenceDataError) -> Self {
        Self::ReferenceData(value)
    }
}

impl From<AuditDateError> for AppError {
    fn from(value: AuditDateError) -> Self {
        Self::AuditDate(value)
    }
}

impl From<ScheduleSourceError> for AppError {
    fn from(value: ScheduleSourceError) -> Self {
        Self::Source(value)
    }
}

impl From<ForecastError> for AppError {
    fn from(value: ForecastError) -> Self {
        Self::Forecast(value)
    }
}

impl From<ForecastServiceError> for AppError {
    fn from(value: ForecastServiceError) -> Self {
        match value {
            ForecastServiceError::AuditDate(err) => Self::AuditDate(err),
            ForecastServiceError::Source(err) => Self::Source(err),
            ForecastServiceError::Forecast(err) => Self::Forecast(err),
        }
    }
}
