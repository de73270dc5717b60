use thiserror::Error;

/// Errors surfaced by the copy pipeline
#[derive(Debug, Error)]
pub enum CopyError {
    /// Outbound model call failed or timed out
    #[error("completion failed: {0}")]
    CompletionFailed(String),

    /// Model reply could not be parsed into the expected shape
    #[error("could not recover model response: {0}")]
    RecoveryFailed(String),

    /// Caller supplied an empty required field
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// Caller cancelled the operation
    #[error("operation cancelled")]
    Cancelled,
}

impl CopyError {
    /// Errors a fallback strategy may absorb by substituting heuristic copy
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::CompletionFailed(_) | Self::RecoveryFailed(_))
    }

    /// Errors that should reach end users as "please try again"
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CompletionFailed(_) | Self::RecoveryFailed(_) | Self::Cancelled
        )
    }
}

pub type Result<T> = std::result::Result<T, CopyError>;
