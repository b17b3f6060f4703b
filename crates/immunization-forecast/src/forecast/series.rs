use serde::{Deserialize, Serialize};

const EVALUATION_FOCUS_PREFIX: &str = "Immunization Evaluation Focus (";

/// CVX codes for meningococcal B products (162 two-dose brand, 163 single/two-dose brand, 164 unspecified).
pub const MENB_CVX_CODES: [u16; 3] = [162, 163, 164];

/// Vaccine families the override rules key on. Anything else is carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VaccineSeries {
    HepA,
    Hib,
    Meningococcal,
    MeningococcalB,
    MenB,
    Pcv,
    Ppsv,
    Hpv,
    Rotavirus,
    Mmr,
    Varicella,
    Influenza,
    Other(String),
}

impl VaccineSeries {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "hep a vaccine group" => Self::HepA,
            "hib vaccine group" => Self::Hib,
            "meningococcal vaccine group" => Self::Meningococcal,
            "meningococcal b vaccine group" => Self::MeningococcalB,
            "menb vaccine group" => Self::MenB,
            "pcv vaccine group" | "pneumococcal conjugate 13 valent (pcv 13" => Self::Pcv,
            "ppsv vaccine group" => Self::Ppsv,
            "hpv vaccine group" => Self::Hpv,
            "rotavirus vaccine group" => Self::Rotavirus,
            "mmr vaccine group" => Self::Mmr,
            "varicella vaccine group" => Self::Varicella,
            "influenza vaccine group" => Self::Influenza,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::HepA => "Hep A Vaccine Group",
            Self::Hib => "Hib Vaccine Group",
            Self::Meningococcal => "Meningococcal Vaccine Group",
            Self::MeningococcalB => "Meningococcal B Vaccine Group",
            Self::MenB => "MenB Vaccine Group",
            Self::Pcv => "PCV Vaccine Group",
            Self::Ppsv => "PPSV Vaccine Group",
            Self::Hpv => "HPV Vaccine Group",
            Self::Rotavirus => "Rotavirus Vaccine Group",
            Self::Mmr => "MMR Vaccine Group",
            Self::Varicella => "Varicella Vaccine Group",
            Self::Influenza => "Influenza Vaccine Group",
            Self::Other(label) => label,
        }
    }

    /// Series whose live-vaccine doses are deferred after immunoglobulin.
    pub fn is_immunoglobulin_sensitive(&self) -> bool {
        matches!(self, Self::Rotavirus | Self::Mmr | Self::Varicella)
    }
}

/// Normalize an engine series label: unwrap `Immunization Evaluation Focus (...)` and map `Td` to DTP.
pub fn format_series_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("Td") {
        return "DTP Vaccine Group".to_string();
    }

    trimmed
        .replace(EVALUATION_FOCUS_PREFIX, "")
        .replace(')', "")
        .trim()
        .to_string()
}

/// Generic `"<family> Vaccine Group"` label for a shot the engine left unlabelled.
pub fn fallback_series_name(family: &str, cvx_codes: &[u16]) -> String {
    if cvx_codes.iter().any(|code| MENB_CVX_CODES.contains(code)) {
        return VaccineSeries::MenB.label().to_string();
    }

    let family = family.trim();
    let family = if family.eq_ignore_ascii_case("HepB") {
        "Hep B"
    } else if family.eq_ignore_ascii_case("Pneumo") {
        "PCV"
    } else {
        family
    };

    format!("{family} Vaccine Group")
}
