use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::risk::{CodingSystem, Condition};

/// Immutable snapshot of the diagnosis codes that mark a patient high-risk, per condition and coding system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceCodeSet {
    sets: HashMap<(Condition, CodingSystem), HashSet<String>>,
}

impl ReferenceCodeSet {
    /// No reference data: every risk lookup answers false.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, condition: Condition, system: CodingSystem, code: impl Into<String>) {
        self.sets
            .entry((condition, system))
            .or_default()
            .insert(code.into());
    }

    pub fn contains(&self, condition: Condition, system: CodingSystem, code: &str) -> bool {
        self.sets
            .get(&(condition, system))
            .map(|codes| codes.contains(code))
            .unwrap_or(false)
    }

    pub fn codes(&self, condition: Condition, system: CodingSystem) -> Option<&HashSet<String>> {
        self.sets.get(&(condition, system))
    }

    /// Total number of codes across all sets.
    pub fn len(&self) -> usize {
        self.sets.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: Into<String>> FromIterator<(Condition, CodingSystem, S)> for ReferenceCodeSet {
    fn from_iter<T: IntoIterator<Item = (Condition, CodingSystem, S)>>(iter: T) -> Self {
        let mut set = Self::empty();
        for (condition, system, code) in iter {
            set.insert(condition, system, code);
        }
        set
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReferenceDataError {
    #[error("failed to read reference code sets: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid reference code CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown condition '{value}' on line {line}")]
    UnknownCondition { value: String, line: u64 },
    #[error("unknown coding system '{value}' on line {line}")]
    UnknownCodingSystem { value: String, line: u64 },
}

#[derive(Debug, Deserialize)]
struct CodeRow {
    condition: String,
    coding_system: String,
    #[serde(default)]
    code: String,
}

/// Loads a `condition,coding_system,code` CSV into a [`ReferenceCodeSet`].
pub struct ReferenceCodeImporter;

impl ReferenceCodeImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ReferenceCodeSet, ReferenceDataError> {
        let file = std::fs::File::open(path.as_ref())?;
        let set = Self::from_reader(file)?;
        info!(
            path = %path.as_ref().display(),
            codes = set.len(),
            "loaded reference code sets"
        );
        Ok(set)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ReferenceCodeSet, ReferenceDataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut record = csv::StringRecord::new();
        let mut set = ReferenceCodeSet::empty();

        while csv_reader.read_record(&mut record)? {
            let line = record.position().map(|position| position.line()).unwrap_or(0);
            let row: CodeRow = record.deserialize(Some(&headers))?;

            let condition = Condition::parse(&row.condition).ok_or_else(|| {
                ReferenceDataError::UnknownCondition {
                    value: row.condition.clone(),
                    line,
                }
            })?;
            let system = CodingSystem::parse(&row.coding_system).ok_or_else(|| {
                ReferenceDataError::UnknownCodingSystem {
                    value: row.coding_system.clone(),
                    line,
                }
            })?;

            if row.code.is_empty() {
                continue;
            }
            set.insert(condition, system, row.code);
        }

        Ok(set)
    }
}
