use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::RiskProfile;
use super::reference::ReferenceCodeSet;

/// Conditions with an institution-maintained diagnosis code list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Hib,
    Meningococcal,
    MenB,
    Pcv13,
    Ppsv,
    Hpv,
}

impl Condition {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Hib,
            Self::Meningococcal,
            Self::MenB,
            Self::Pcv13,
            Self::Ppsv,
            Self::Hpv,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hib => "Hib",
            Self::Meningococcal => "Meningococcal",
            Self::MenB => "MenB",
            Self::Pcv13 => "PCV13",
            Self::Ppsv => "PPSV",
            Self::Hpv => "HPV",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hib" => Some(Self::Hib),
            "meningococcal" | "meningoccocal" => Some(Self::Meningococcal),
            "menb" => Some(Self::MenB),
            "pcv13" | "pcv" => Some(Self::Pcv13),
            "ppsv" | "ppsv23" => Some(Self::Ppsv),
            "hpv" => Some(Self::Hpv),
            _ => None,
        }
    }
}

/// Diagnosis coding systems accepted on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodingSystem {
    Icd9,
    Icd10,
}

impl CodingSystem {
    pub const fn ordered() -> [Self; 2] {
        [Self::Icd9, Self::Icd10]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Icd9 => "ICD9",
            Self::Icd10 => "ICD10",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace(['-', ' '], "").as_str() {
            "icd9" | "icd9cm" => Some(Self::Icd9),
            "icd10" | "icd10cm" => Some(Self::Icd10),
            _ => None,
        }
    }
}

/// Answers "is this patient high-risk for condition X" against a fixed reference snapshot.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    codes: Arc<ReferenceCodeSet>,
}

impl RiskClassifier {
    pub fn new(codes: Arc<ReferenceCodeSet>) -> Self {
        Self { codes }
    }

    /// Any ICD9 code in the condition's ICD9 set, or any ICD10 code in its ICD10 set.
    pub fn is_high_risk(&self, condition: Condition, profile: &RiskProfile) -> bool {
        let icd9 = profile
            .icd9_codes()
            .iter()
            .any(|code| self.codes.contains(condition, CodingSystem::Icd9, code));
        if icd9 {
            return true;
        }

        profile
            .icd10_codes()
            .iter()
            .any(|code| self.codes.contains(condition, CodingSystem::Icd10, code))
    }
}
