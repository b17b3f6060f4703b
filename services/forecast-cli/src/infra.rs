use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use immunization_forecast::config::AppConfig;
use immunization_forecast::error::AppError;
use immunization_forecast::forecast::{
    CdsSchedule, ReferenceCodeImporter, ReferenceCodeSet, ReferenceDataError, ScheduleSource,
    ScheduleSourceError,
};
use tracing::debug;

/// Schedule source backed by a single exported engine response on disk.
pub(crate) struct JsonScheduleSource {
    path: PathBuf,
}

impl JsonScheduleSource {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScheduleSource for JsonScheduleSource {
    fn schedule(
        &self,
        patient_id: &str,
        audit_date: NaiveDate,
    ) -> Result<CdsSchedule, ScheduleSourceError> {
        debug!(
            patient_id,
            %audit_date,
            path = %self.path.display(),
            "reading schedule export"
        );
        let raw = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

/// Resolve the reference code snapshot from the flag, falling back to configuration.
pub(crate) fn load_reference_codes(
    flag: Option<&Path>,
    config: &AppConfig,
) -> Result<Arc<ReferenceCodeSet>, AppError> {
    let path = flag
        .map(Path::to_path_buf)
        .or_else(|| config.reference.code_sets_path.clone())
        .ok_or_else(|| {
            ReferenceDataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no reference code sets configured (pass --codes or set FORECAST_CODE_SETS)",
            ))
        })?;

    Ok(Arc::new(ReferenceCodeImporter::from_path(path)?))
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read(path)?;
    Ok(serde_json::from_slice(&raw)?)
}
