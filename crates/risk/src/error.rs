use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Alert threshold must be between 0 and 100, got {0}")]
    InvalidThreshold(Decimal),
}
