use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::ShotRecord;
use super::series::{fallback_series_name, format_series_name};

pub const CIR_RULES_DESCRIPTION: &str = "CIR recommendation rules";

/// Titre results recorded as immunizations; each counts as evidence for a series.
const ANTIBODY_SERIES: [(u32, &str); 6] = [
    (32373, "Varicella Vaccine Group"),
    (32314, "Hep B Vaccine Group"),
    (32368, "MMR Vaccine Group"),
    (32349, "MMR Vaccine Group"),
    (32067, "MMR Vaccine Group"),
    (32182, "Hep A Vaccine Group"),
];

pub fn antibody_series(mix_code: u32) -> Option<&'static str> {
    ANTIBODY_SERIES
        .iter()
        .find(|(code, _)| *code == mix_code)
        .map(|(_, series)| *series)
}

/// One row of the immunization query; an immunization spans several rows for combination products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmunizationRow {
    pub immunization_id: String,
    #[serde(default)]
    pub cvx_code: Option<u16>,
    pub display_group: String,
    #[serde(default)]
    pub mix_code: Option<u32>,
    #[serde(default)]
    pub lot_number: Option<String>,
    #[serde(default)]
    pub display_flag: String,
    pub shot_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdministrationStatus {
    Completed,
    EnteredInError,
    Stopped,
}

impl AdministrationStatus {
    pub fn from_display_flag(flag: &str) -> Self {
        match flag.trim().to_ascii_uppercase().as_str() {
            "Y" => Self::Completed,
            "N" | "I" => Self::EnteredInError,
            _ => Self::Stopped,
        }
    }
}

/// Whether the engine counted a dose toward a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoseStatus {
    #[serde(rename = "counts")]
    Counts,
    #[serde(rename = "nocount")]
    NoCount,
}

impl DoseStatus {
    pub fn from_validity(is_valid: bool) -> Self {
        if is_valid {
            Self::Counts
        } else {
            Self::NoCount
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Counts => "counts",
            Self::NoCount => "nocount",
        }
    }

    pub const fn display(self) -> &'static str {
        match self {
            Self::Counts => "Counts",
            Self::NoCount => "Does Not Count",
        }
    }
}

/// A series an immunization is shown under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolEntry {
    pub series: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dose_sequence: Option<u32>,
    #[serde(default)]
    pub dose_status: Option<DoseStatus>,
    #[serde(default)]
    pub dose_status_reason: Option<String>,
}

impl ProtocolEntry {
    pub fn raw(series: impl Into<String>) -> Self {
        Self {
            series: series.into(),
            description: None,
            dose_sequence: None,
            dose_status: None,
            dose_status_reason: None,
        }
    }

    fn cir(series: impl Into<String>) -> Self {
        Self {
            description: Some(CIR_RULES_DESCRIPTION.to_string()),
            ..Self::raw(series)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmunizationRecord {
    pub immunization_id: String,
    pub cvx_codes: Vec<u16>,
    pub shot_date: NaiveDate,
    pub status: AdministrationStatus,
    #[serde(default)]
    pub lot_number: Option<String>,
    pub protocols: Vec<ProtocolEntry>,
}

impl ImmunizationRecord {
    fn from_row(row: ImmunizationRow) -> Self {
        let mut protocols = vec![ProtocolEntry::raw(row.display_group)];
        if let Some(series) = row.mix_code.and_then(antibody_series) {
            protocols.push(ProtocolEntry::cir(series));
        }

        Self {
            immunization_id: row.immunization_id,
            cvx_codes: row.cvx_code.into_iter().collect(),
            shot_date: row.shot_date,
            status: AdministrationStatus::from_display_flag(&row.display_flag),
            lot_number: row.lot_number.filter(|lot| !lot.trim().is_empty()),
            protocols,
        }
    }

    fn absorb(&mut self, row: ImmunizationRow) {
        if let Some(lot) = row.lot_number.filter(|lot| !lot.trim().is_empty()) {
            self.lot_number = Some(match self.lot_number.take() {
                Some(existing) => format!("{existing}, {lot}"),
                None => lot,
            });
        }
        if let Some(code) = row.cvx_code {
            if !self.cvx_codes.contains(&code) {
                self.cvx_codes.push(code);
            }
        }
        self.protocols.push(ProtocolEntry::raw(row.display_group));
    }
}

/// Collapse query rows into one record per immunization, in first-seen order.
pub fn assemble_immunizations<I>(rows: I) -> Vec<ImmunizationRecord>
where
    I: IntoIterator<Item = ImmunizationRow>,
{
    let mut records: Vec<ImmunizationRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in rows {
        match positions.get(&row.immunization_id) {
            Some(position) => records[*position].absorb(row),
            None => {
                positions.insert(row.immunization_id.clone(), records.len());
                records.push(ImmunizationRecord::from_row(row));
            }
        }
    }

    records
}

/// Attach engine series, validity and reasons to each record, then add a generic
/// series label to records left with a single protocol.
pub fn merge_shot_history(
    records: Vec<ImmunizationRecord>,
    shots: &[ShotRecord],
) -> Vec<ImmunizationRecord> {
    records
        .into_iter()
        .map(|mut record| {
            for shot in shots
                .iter()
                .filter(|shot| shot.immunization_id == record.immunization_id)
            {
                let status = DoseStatus::from_validity(shot.is_valid);
                for annotation in &shot.annotations {
                    record.protocols.push(ProtocolEntry {
                        dose_sequence: Some(shot.dose_sequence),
                        dose_status: Some(status),
                        dose_status_reason: annotation.reason.clone(),
                        ..ProtocolEntry::cir(format_series_name(&annotation.series))
                    });
                }
            }

            if let [only] = record.protocols.as_slice() {
                let series = fallback_series_name(&only.series, &record.cvx_codes);
                record.protocols.push(ProtocolEntry::cir(series));
            }

            record
        })
        .collect()
}
