use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const SEPARATOR: &str = " - ";

/// What the forecast tells the clinician to do for a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Recommended,
    RecommendedCmc,
    RecommendedCmcAge,
    NotRecommended,
    Conditional,
    FutureRecommended,
    FutureRecommendedCmc,
    NotSupported,
    NeedsThreeDoses,
    Other(String),
}

impl Action {
    pub fn parse(token: &str) -> Self {
        match token.trim() {
            "RECOMMENDED" => Self::Recommended,
            "RECOMMENDED_CMC" => Self::RecommendedCmc,
            "RECOMMENDED_CMC_AGE" => Self::RecommendedCmcAge,
            "NOT_RECOMMENDED" => Self::NotRecommended,
            "CONDITIONAL" => Self::Conditional,
            "FUTURE_RECOMMENDED" => Self::FutureRecommended,
            "FUTURE_RECOMMENDED_CMC" => Self::FutureRecommendedCmc,
            "NOT_SUPPORTED" => Self::NotSupported,
            "NEEDS_THREE_DOSES" => Self::NeedsThreeDoses,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Recommended => "RECOMMENDED",
            Self::RecommendedCmc => "RECOMMENDED_CMC",
            Self::RecommendedCmcAge => "RECOMMENDED_CMC_AGE",
            Self::NotRecommended => "NOT_RECOMMENDED",
            Self::Conditional => "CONDITIONAL",
            Self::FutureRecommended => "FUTURE_RECOMMENDED",
            Self::FutureRecommendedCmc => "FUTURE_RECOMMENDED_CMC",
            Self::NotSupported => "NOT_SUPPORTED",
            Self::NeedsThreeDoses => "NEEDS_THREE_DOSES",
            Self::Other(raw) => raw,
        }
    }

    /// Any of the `RECOMMENDED*` actions (not the future or negated forms).
    pub fn is_recommended(&self) -> bool {
        self.as_str().starts_with("RECOMMENDED")
    }

    pub fn is_future_recommended(&self) -> bool {
        self.as_str().starts_with("FUTURE_RECOMMENDED")
    }

    pub fn is_not_recommended(&self) -> bool {
        self.as_str().starts_with("NOT_RECOMMENDED")
    }
}

/// Why the action was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reason {
    HighRisk,
    NotHighRisk,
    IfHighRisk,
    Age,
    DueNow,
    DueNowInvalid,
    DueInFuture,
    Complete,
    PermissiveRec,
    OtherVaccine,
    Cmc,
    IgInterval,
    Pcv13DueFuture,
    AfterPcv13,
    MayNeedPcv13,
    PcvComplete,
    GiveAfterMinimumInterval,
    Other(String),
}

impl Reason {
    pub fn parse(token: &str) -> Self {
        match token.trim() {
            "HIGH_RISK" => Self::HighRisk,
            "NOT_HIGH_RISK" => Self::NotHighRisk,
            "IF_HIGH_RISK" => Self::IfHighRisk,
            "AGE" => Self::Age,
            "DUE_NOW" => Self::DueNow,
            "DUE_NOW_INVALID" => Self::DueNowInvalid,
            "DUE_IN_FUTURE" => Self::DueInFuture,
            "COMPLETE" => Self::Complete,
            "PERMISSIVE_REC" => Self::PermissiveRec,
            "OTHER_VACCINE" => Self::OtherVaccine,
            "CMC" => Self::Cmc,
            "IG_INTERVAL" => Self::IgInterval,
            "PCV13_DUE_FUTURE" => Self::Pcv13DueFuture,
            "AFTER_PCV13" => Self::AfterPcv13,
            "MAY_NEED_PCV13" => Self::MayNeedPcv13,
            "PCV_COMPLETE" => Self::PcvComplete,
            "GIVE_AFTER_MINIMUM_INTERVAL" => Self::GiveAfterMinimumInterval,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::HighRisk => "HIGH_RISK",
            Self::NotHighRisk => "NOT_HIGH_RISK",
            Self::IfHighRisk => "IF_HIGH_RISK",
            Self::Age => "AGE",
            Self::DueNow => "DUE_NOW",
            Self::DueNowInvalid => "DUE_NOW_INVALID",
            Self::DueInFuture => "DUE_IN_FUTURE",
            Self::Complete => "COMPLETE",
            Self::PermissiveRec => "PERMISSIVE_REC",
            Self::OtherVaccine => "OTHER_VACCINE",
            Self::Cmc => "CMC",
            Self::IgInterval => "IG_INTERVAL",
            Self::Pcv13DueFuture => "PCV13_DUE_FUTURE",
            Self::AfterPcv13 => "AFTER_PCV13",
            Self::MayNeedPcv13 => "MAY_NEED_PCV13",
            Self::PcvComplete => "PCV_COMPLETE",
            Self::GiveAfterMinimumInterval => "GIVE_AFTER_MINIMUM_INTERVAL",
            Self::Other(raw) => raw,
        }
    }
}

/// A series decision. Serialized as `"<ACTION> - <REASON>"`, the form downstream consumers parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decision {
    pub action: Action,
    pub reason: Reason,
}

impl Decision {
    pub fn new(action: Action, reason: Reason) -> Self {
        Self { action, reason }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().split_once(SEPARATOR) {
            Some((action, reason)) => Self::new(Action::parse(action), Reason::parse(reason)),
            None => Self::new(Action::parse(raw), Reason::Other(String::new())),
        }
    }

    /// Exact action and a reason beginning with `reason_prefix`.
    pub fn is(&self, action: &Action, reason_prefix: &str) -> bool {
        self.action == *action && self.reason.as_str().starts_with(reason_prefix)
    }

    pub fn wire(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = self.reason.as_str();
        if reason.is_empty() {
            f.write_str(self.action.as_str())
        } else {
            write!(f, "{}{}{}", self.action.as_str(), SEPARATOR, reason)
        }
    }
}

impl Serialize for Decision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Decision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
