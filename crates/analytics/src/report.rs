use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four dimensions a portfolio is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DimensionId {
    CashBuffer,
    Concentration,
    Platform,
    Volatility,
}

impl DimensionId {
    /// Maximum points for this dimension. The four maxima sum to 100.
    pub fn max_score(&self) -> u32 {
        match self {
            DimensionId::CashBuffer => 25,
            DimensionId::Concentration => 30,
            DimensionId::Platform => 20,
            DimensionId::Volatility => 25,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DimensionId::CashBuffer => "Cash buffer",
            DimensionId::Concentration => "Concentration",
            DimensionId::Platform => "Platform diversity",
            DimensionId::Volatility => "Volatility",
        }
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Overall health bucket derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Excellent,
    Good,
    Warning,
    Danger,
}

impl Grade {
    /// Picks the highest bucket whose threshold the total reaches.
    pub fn from_total(total: u32) -> Self {
        match total {
            80.. => Grade::Excellent,
            60..=79 => Grade::Good,
            40..=59 => Grade::Warning,
            _ => Grade::Danger,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Excellent => "excellent",
            Grade::Good => "good",
            Grade::Warning => "warning",
            Grade::Danger => "danger",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of scoring one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScore {
    pub id: DimensionId,
    pub score: u32,
    pub max_score: u32,
    /// The measured input: a share of total value, or the platform count.
    pub metric: Decimal,
    /// Improvement hint, present only when the dimension is below target.
    pub suggestion: Option<String>,
}

impl DimensionScore {
    /// A zero score for portfolios without data.
    pub fn empty(id: DimensionId) -> Self {
        Self {
            id,
            score: 0,
            max_score: id.max_score(),
            metric: Decimal::ZERO,
            suggestion: None,
        }
    }

    /// Fraction of the available points that were earned.
    pub fn ratio(&self) -> Decimal {
        if self.max_score == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.score) / Decimal::from(self.max_score)
    }
}

/// The portfolio health score: a 0-100 total built from four weighted dimensions.
///
/// This struct is recomputed from scratch whenever holdings change and is never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    pub total: u32,
    pub grade: Grade,
    pub has_data: bool,
    pub dimensions: Vec<DimensionScore>,
    /// The dimension with the lowest earned ratio. `None` without data or when
    /// every dimension is at full marks.
    pub weakest: Option<DimensionId>,
    pub advice: Vec<String>,
}

impl HealthScore {
    pub fn dimension(&self, id: DimensionId) -> Option<&DimensionScore> {
        self.dimensions.iter().find(|d| d.id == id)
    }
}
