use serde::{Deserialize, Serialize};

/// Deployment switches for the override pipeline, resolved once from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPolicy {
    /// The CDS engine already forecasts Meningococcal B; refine its entry instead of computing one.
    pub engine_supplies_menb: bool,
    /// Defer live-vaccine doses given within three months of immunoglobulin.
    pub immunoglobulin_interval_rule: bool,
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self {
            engine_supplies_menb: false,
            immunoglobulin_interval_rule: true,
        }
    }
}
