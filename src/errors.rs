use std::path::PathBuf;

use thiserror::Error;

/// Error type that captures every ledger failure surfaced to callers.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid date `{0}`: expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid amount `{0}`: expected a non-negative number")]
    InvalidAmount(String),
    #[error("Corrupt ledger file {}: {reason}", path.display())]
    CorruptStorage { path: PathBuf, reason: String },
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl LedgerError {
    /// True for user-input failures that leave the ledger untouched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidDate(_) | LedgerError::InvalidAmount(_)
        )
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LedgerError::CorruptStorage {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
