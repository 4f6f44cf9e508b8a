//! Error types for EmbSet.
//!
//! A single error enum covers every failure the index can surface:
//! embedding provider failures, backend capacity and dimensionality
//! violations, plus the configuration and I/O errors of the surrounding
//! tooling.

use thiserror::Error;

/// Unified error type for EmbSet.
///
/// Index and backend operations return `Result<T, AppError>` and never
/// panic on caller input. Errors are surfaced unchanged; nothing in the
/// index retries.
#[derive(Error, Debug)]
pub enum AppError {
    /// The embedding provider failed to produce vectors for a batch
    #[error("Provider error: {0}")]
    Provider(String),

    /// A capacity-limited backend refused to store another vector
    #[error("Backend capacity exceeded: limit is {capacity} vectors")]
    BackendCapacity { capacity: usize },

    /// A vector's length does not match the dimensionality already in use
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_error_display() {
        let err = AppError::BackendCapacity { capacity: 8 };
        assert_eq!(err.to_string(), "Backend capacity exceeded: limit is 8 vectors");
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = AppError::DimensionMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, got 2");
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<Vec<f32>>("[1.0,").unwrap_err();
        let err: AppError = parse_err.into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
