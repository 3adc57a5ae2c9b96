use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to parse portfolio snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
