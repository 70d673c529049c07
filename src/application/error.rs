use thiserror::Error;

use crate::domain::{AmountError, MonthKeyError, ProfileError, SessionError};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    #[error("Invalid login: {0}")]
    InvalidSession(#[from] SessionError),

    #[error("Invalid month: {0}")]
    InvalidMonth(#[from] MonthKeyError),

    #[error("Failed to encode ledger data: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl LedgerError {
    /// Validation failures are rejections of user input; nothing was changed or written.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidAmount(_)
                | LedgerError::InvalidProfile(_)
                | LedgerError::InvalidSession(_)
                | LedgerError::InvalidMonth(_)
        )
    }
}
