use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Datelike, NaiveDate};

use crate::forecast::{
    CdsSchedule, CodingSystem, Condition, Decision, FluSeasonWindow, ForecastEngine,
    ForecastEntry, ForecastOutcome, ForecastPolicy, Gender, ReferenceCodeSet, RiskProfile,
    ScheduleSource, ScheduleSourceError, SeriesAnnotation, ShotRecord, VaccineSeries,
};

pub(super) const ASPLENIA_ICD9: &str = "759.0";
pub(super) const ASPLENIA_ICD10: &str = "D73.0";
pub(super) const HIV_ICD10: &str = "B20";

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn audit_date() -> NaiveDate {
    date(2023, 11, 1)
}

/// Asplenia flags every condition except HPV; HIV flags HPV only.
pub(super) fn reference_codes() -> ReferenceCodeSet {
    let mut codes = ReferenceCodeSet::empty();
    for condition in [
        Condition::Hib,
        Condition::Meningococcal,
        Condition::MenB,
        Condition::Pcv13,
        Condition::Ppsv,
    ] {
        codes.insert(condition, CodingSystem::Icd9, ASPLENIA_ICD9);
        codes.insert(condition, CodingSystem::Icd10, ASPLENIA_ICD10);
    }
    codes.insert(Condition::Hpv, CodingSystem::Icd10, HIV_ICD10);
    codes
}

pub(super) fn engine() -> ForecastEngine {
    engine_with(ForecastPolicy::default())
}

pub(super) fn engine_with(policy: ForecastPolicy) -> ForecastEngine {
    ForecastEngine::new(Arc::new(reference_codes()), policy)
}

/// A patient of `age` whole years at the audit date.
pub(super) fn patient(age: i32) -> RiskProfile {
    let audit = audit_date();
    let dob = date(audit.year() - age, 6, 1);
    RiskProfile::new(dob, Gender::Female, audit).expect("valid profile")
}

pub(super) fn high_risk_patient(age: i32) -> RiskProfile {
    patient(age).with_icd10([ASPLENIA_ICD10])
}

pub(super) fn decision(wire: &str) -> Decision {
    Decision::parse(wire)
}

pub(super) fn entry(series: &VaccineSeries, wire: &str) -> ForecastEntry {
    ForecastEntry::new(series.label(), "Recommended", decision(wire))
}

pub(super) fn shot(id: &str, cvx: u16, shot_date: NaiveDate, series: &[&str]) -> ShotRecord {
    ShotRecord {
        immunization_id: id.to_string(),
        cvx_code: Some(cvx),
        shot_date,
        annotations: series
            .iter()
            .map(|series| SeriesAnnotation {
                series: series.to_string(),
                reason: None,
            })
            .collect(),
        is_valid: true,
        dose_sequence: 1,
    }
}

pub(super) fn invalid(mut record: ShotRecord) -> ShotRecord {
    record.is_valid = false;
    record
}

pub(super) fn flu_shot(id: &str, shot_date: NaiveDate) -> ShotRecord {
    shot(id, 150, shot_date, &["Influenza Vaccine Group"])
}

pub(super) fn run(
    engine: &ForecastEngine,
    profile: &RiskProfile,
    baseline: &[ForecastEntry],
    history: &[ShotRecord],
) -> ForecastOutcome {
    let window = FluSeasonWindow::containing(profile.audit_date());
    engine
        .apply(profile, baseline, history, &window)
        .expect("forecast succeeds")
}

/// Wire text of the first entry for `series`.
pub(super) fn wire_for(outcome: &ForecastOutcome, series: &VaccineSeries) -> String {
    outcome
        .entry(series)
        .map(|entry| entry.decision.wire())
        .unwrap_or_else(|| panic!("missing {} entry", series.label()))
}

/// Apply the default engine to a single-series baseline for a given patient.
pub(super) fn override_one(
    profile: &RiskProfile,
    series: &VaccineSeries,
    wire: &str,
    history: &[ShotRecord],
) -> String {
    let outcome = run(&engine(), profile, &[entry(series, wire)], history);
    wire_for(&outcome, series)
}

#[derive(Default)]
pub(super) struct InMemoryScheduleSource {
    schedules: Mutex<HashMap<String, CdsSchedule>>,
}

impl InMemoryScheduleSource {
    pub(super) fn with(patient_id: &str, schedule: CdsSchedule) -> Self {
        let source = Self::default();
        source
            .schedules
            .lock()
            .expect("lock")
            .insert(patient_id.to_string(), schedule);
        source
    }
}

impl ScheduleSource for InMemoryScheduleSource {
    fn schedule(
        &self,
        patient_id: &str,
        _audit_date: NaiveDate,
    ) -> Result<CdsSchedule, ScheduleSourceError> {
        self.schedules
            .lock()
            .expect("lock")
            .get(patient_id)
            .cloned()
            .ok_or_else(|| ScheduleSourceError::NotFound(patient_id.to_string()))
    }
}
