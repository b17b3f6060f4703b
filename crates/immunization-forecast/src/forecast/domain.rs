use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::dates::{whole_months_between, whole_years_between};
use super::decision::Decision;
use super::engine::ForecastError;
use super::series::{format_series_name, VaccineSeries};

/// Administrative sex as reported by the engine export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "M" => Self::Male,
            "F" => Self::Female,
            _ => Self::Unknown,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "U",
        }
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Gender> for String {
    fn from(value: Gender) -> Self {
        value.code().to_string()
    }
}

/// Per-request facts about the patient used by the risk classifier and age-based rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskProfile {
    icd9_codes: BTreeSet<String>,
    icd10_codes: BTreeSet<String>,
    date_of_birth: NaiveDate,
    gender: Gender,
    audit_date: NaiveDate,
}

impl RiskProfile {
    pub fn new(
        date_of_birth: NaiveDate,
        gender: Gender,
        audit_date: NaiveDate,
    ) -> Result<Self, ForecastError> {
        if date_of_birth > audit_date {
            return Err(ForecastError::InvalidProfile {
                detail: format!(
                    "date of birth {date_of_birth} is after audit date {audit_date}"
                ),
            });
        }

        Ok(Self {
            icd9_codes: BTreeSet::new(),
            icd10_codes: BTreeSet::new(),
            date_of_birth,
            gender,
            audit_date,
        })
    }

    /// Build a profile from the pipe-delimited code strings supplied by the caller.
    pub fn from_request(
        icd9: Option<&str>,
        icd10: Option<&str>,
        date_of_birth: NaiveDate,
        gender: Gender,
        audit_date: NaiveDate,
    ) -> Result<Self, ForecastError> {
        let mut profile = Self::new(date_of_birth, gender, audit_date)?;
        if let Some(raw) = icd9 {
            profile.icd9_codes = split_codes(raw);
        }
        if let Some(raw) = icd10 {
            profile.icd10_codes = split_codes(raw);
        }
        Ok(profile)
    }

    pub fn with_icd9<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.icd9_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    pub fn with_icd10<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.icd10_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    pub fn icd9_codes(&self) -> &BTreeSet<String> {
        &self.icd9_codes
    }

    pub fn icd10_codes(&self) -> &BTreeSet<String> {
        &self.icd10_codes
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn audit_date(&self) -> NaiveDate {
        self.audit_date
    }

    pub fn age_in_years(&self) -> i32 {
        whole_years_between(self.date_of_birth, self.audit_date)
    }

    pub fn age_in_months(&self) -> i32 {
        whole_months_between(self.date_of_birth, self.audit_date)
    }
}

/// Split a `745.6|748`-style list into distinct, trimmed, non-empty codes.
pub fn split_codes(raw: &str) -> BTreeSet<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// One series a dose was evaluated against, with the engine's reason for counting it or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesAnnotation {
    pub series: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// A dose as evaluated by the external engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub immunization_id: String,
    #[serde(default)]
    pub cvx_code: Option<u16>,
    pub shot_date: NaiveDate,
    #[serde(default)]
    pub annotations: Vec<SeriesAnnotation>,
    pub is_valid: bool,
    #[serde(default)]
    pub dose_sequence: u32,
}

impl ShotRecord {
    /// True when any annotation names `series` once formatted.
    pub fn in_series(&self, series: &VaccineSeries) -> bool {
        self.annotations.iter().any(|annotation| {
            VaccineSeries::from_label(&format_series_name(&annotation.series)) == *series
        })
    }

    pub fn has_cvx(&self, codes: &[u16]) -> bool {
        self.cvx_code.map(|code| codes.contains(&code)).unwrap_or(false)
    }
}

/// One series' recommendation in the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub series: String,
    pub forecast_status: String,
    #[serde(rename = "protocol_description")]
    pub decision: Decision,
    #[serde(default)]
    pub date_criteria: Vec<NaiveDate>,
}

impl ForecastEntry {
    pub fn new(
        series: impl Into<String>,
        forecast_status: impl Into<String>,
        decision: Decision,
    ) -> Self {
        Self {
            series: series.into(),
            forecast_status: forecast_status.into(),
            decision,
            date_criteria: Vec::new(),
        }
    }

    pub fn series_id(&self) -> VaccineSeries {
        VaccineSeries::from_label(&self.series)
    }
}

/// Influenza season bounds. Doses before `cutoff_date` count as prior-season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FluSeasonWindow {
    pub season_start: NaiveDate,
    pub season_end: NaiveDate,
    pub cutoff_date: NaiveDate,
}

impl FluSeasonWindow {
    /// The Aug 1 – Jul 31 season that contains `audit_date`.
    pub fn containing(audit_date: NaiveDate) -> Self {
        let start_year = if audit_date.month() < 8 {
            audit_date.year() - 1
        } else {
            audit_date.year()
        };

        let season_start = NaiveDate::from_ymd_opt(start_year, 8, 1).unwrap_or(audit_date);
        let season_end = NaiveDate::from_ymd_opt(start_year + 1, 7, 31).unwrap_or(audit_date);

        Self {
            season_start,
            season_end,
            cutoff_date: season_start,
        }
    }
}

/// Audit date rejected at the request boundary.
#[derive(Debug, thiserror::Error)]
pub enum AuditDateError {
    #[error("invalid audit date '{0}', correct format is YYYYMMDD")]
    Format(String),
    #[error("audit date {audit_date} cannot be after {today}")]
    InFuture {
        audit_date: NaiveDate,
        today: NaiveDate,
    },
}

/// Parse a `YYYYMMDD` audit date, defaulting to `today` when absent.
pub fn parse_audit_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, AuditDateError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(today);
    };

    let audit_date = NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map_err(|_| AuditDateError::Format(raw.to_string()))?;

    if audit_date > today {
        return Err(AuditDateError::InFuture { audit_date, today });
    }

    Ok(audit_date)
}
