use core_types::CurrencyRates;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the entire application.
///
/// Every section is optional; a missing `allfi.toml` yields the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Currency to USD multipliers applied to manual assets.
    pub currency_rates: CurrencyRates,
    pub scoring: Scoring,
    pub alerts: Alerts,
    pub export: Export,
}

/// Thresholds that shape the four health-score dimensions.
///
/// The maximum points per dimension are fixed; these only move the point at
/// which a dimension reaches (or starts losing) full marks.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Scoring {
    /// Symbols treated as cash. Counted by both the cash buffer and volatility dimensions.
    pub stablecoins: Vec<String>,
    /// Non-stable symbols treated as low-volatility blue chips.
    pub blue_chips: Vec<String>,
    /// Stablecoin share at which the cash buffer dimension is maxed out.
    pub cash_buffer_target: Decimal,
    /// Largest single-asset share that still earns full concentration marks.
    pub concentration_free_ratio: Decimal,
    /// Number of distinct platforms that earns full diversity marks.
    pub platform_target: u32,
    /// High-cap share at which the volatility dimension is maxed out.
    pub high_cap_target: Decimal,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            stablecoins: ["USDC", "USDT", "DAI", "BUSD", "TUSD", "USDP", "FRAX", "LUSD", "GUSD"]
                .into_iter()
                .map(String::from)
                .collect(),
            blue_chips: vec!["BTC".to_string(), "ETH".to_string()],
            cash_buffer_target: dec!(0.20),
            concentration_free_ratio: dec!(0.25),
            platform_target: 3,
            high_cap_target: dec!(0.60),
        }
    }
}

/// Contains parameters for risk alerting.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Alerts {
    /// Health score (0-100) below which a portfolio alert is raised.
    pub score_threshold: Decimal,
}

impl Default for Alerts {
    fn default() -> Self {
        Self {
            score_threshold: dec!(60),
        }
    }
}

/// The supported export file types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ExportFormat {
    /// Holdings as a spreadsheet-friendly CSV.
    #[default]
    Csv,
    /// Holdings plus portfolio totals as pretty-printed JSON.
    Json,
    /// The transaction history as CSV.
    Transactions,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv | ExportFormat::Transactions => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Export {
    pub default_format: ExportFormat,
    /// Directory export files are written to.
    pub output_dir: String,
}

impl Default for Export {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::default(),
            output_dir: ".".to_string(),
        }
    }
}
