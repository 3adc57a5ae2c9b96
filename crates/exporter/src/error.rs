use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize export document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}
