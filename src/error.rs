//! Error types for the financial health score engine

use thiserror::Error;

/// Result type alias for scoring operations
pub type Result<T> = std::result::Result<T, ScoreError>;

#[derive(Error, Debug)]
pub enum ScoreError {

    // =============================
    // Pipeline Errors
    // =============================

    /// Strict mode rejected the snapshot. The message names the missing
    /// or invalid element.
    #[error("Data validation error: {0}")]
    DataValidation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ScoreError {
    /// True for the strict-mode rejection, false for structural failures.
    pub fn is_data_validation(&self) -> bool {
        matches!(self, ScoreError::DataValidation(_))
    }
}
