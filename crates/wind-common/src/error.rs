//! Error types for the wind-map services.

use thiserror::Error;

/// Result type alias using WindError.
pub type WindResult<T> = Result<T, WindError>;

/// Primary error type for the fetch/validate/present pipeline.
#[derive(Debug, Error)]
pub enum WindError {
    // === Transient failures (retried by the fetcher) ===
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Wind endpoint returned HTTP {0}")]
    HttpStatus(u16),

    // === Permanent failures (never retried) ===
    #[error("Malformed wind payload: {0}")]
    MalformedPayload(String),

    #[error(
        "{component} grid has {actual} samples, header declares {nx}x{ny} ({expected} expected)"
    )]
    GridSizeMismatch {
        component: &'static str,
        nx: usize,
        ny: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Wind payload contains only zero samples")]
    DegenerateData,

    // === Configuration errors ===
    #[error("Invalid style configuration: {0}")]
    InvalidStyle(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Infrastructure errors ===
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl WindError {
    /// Whether the fetcher should retry after this failure.
    ///
    /// Only transport-level and HTTP-status failures are transient; a body
    /// that violates the payload contract is a permanent defect on the
    /// server side and retrying would not help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WindError::Transport(_) | WindError::HttpStatus(_))
    }
}

impl From<std::io::Error> for WindError {
    fn from(err: std::io::Error) -> Self {
        WindError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for WindError {
    fn from(err: serde_json::Error) -> Self {
        WindError::MalformedPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_failures_are_retryable() {
        assert!(WindError::Transport("connection refused".into()).is_retryable());
        assert!(WindError::HttpStatus(503).is_retryable());
    }

    #[test]
    fn permanent_failures_are_not_retryable() {
        assert!(!WindError::MalformedPayload("not an array".into()).is_retryable());
        assert!(!WindError::DegenerateData.is_retryable());
        assert!(!WindError::GridSizeMismatch {
            component: "U",
            nx: 2,
            ny: 2,
            expected: 4,
            actual: 3,
        }
        .is_retryable());
    }
}
