use analytics::{DimensionId, HealthScore};
use serde::Serialize;

pub mod error;
pub mod threshold_monitor;

pub use error::RiskError;
pub use threshold_monitor::ThresholdMonitor;

/// What an alert is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertScope {
    /// The overall health score.
    Portfolio,
    /// A single scoring dimension.
    Dimension(DimensionId),
}

/// A risk notification ready to be shown or delivered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAlert {
    pub scope: AlertScope,
    pub title: String,
    pub message: String,
}

/// Decides which risk alerts a health score warrants.
///
/// Implementations must be pure: evaluating the same score twice yields the
/// same alerts. Delivery is left to the caller.
pub trait RiskMonitor {
    fn evaluate(&self, score: &HealthScore) -> Vec<RiskAlert>;
}
