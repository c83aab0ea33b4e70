use crate::validation::NicknameValidation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Server responded with status {0}")]
    UnexpectedStatus(u16),

    #[error("Authentication expired")]
    AuthExpired,

    #[error("Token refresh failed: {0}")]
    ReauthFailed(String),

    #[error("Invalid nickname: {}", .0.message())]
    Validation(NicknameValidation),

    #[error("History index {index} out of range (len {len})")]
    InvalidHistoryIndex { index: usize, len: usize },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Whether the failure should be shown to the user as a retryable fetch error.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::NetworkFailure(_) | Error::UnexpectedStatus(_))
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::NetworkFailure(format!("decoding failed: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
