use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Currency rate for {currency} must be positive, got {rate}")]
    InvalidRate { currency: String, rate: Decimal },

    #[error("Invalid scoring parameter: {0}")]
    InvalidScoring(String),

    #[error("Alert threshold {0} is outside 0..=100")]
    InvalidThreshold(Decimal),
}
