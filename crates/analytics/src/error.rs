use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Scoring parameters are invalid: {0}")]
    InvalidParameters(String),
}
