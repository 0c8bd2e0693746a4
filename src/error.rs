//! Error types for the oncorisk engine

use crate::cancer::CancerType;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for oncorisk operations
pub type Result<T> = std::result::Result<T, OncoriskError>;

/// Main error type for the engine
#[derive(Error, Debug)]
pub enum OncoriskError {
    #[error("{kind} file not found: {}", path.display())]
    ArtifactNotFound { kind: &'static str, path: PathBuf },

    #[error("Model not trained for {0} cancer. Please train the model first.")]
    ModelNotTrained(CancerType),

    #[error("Target column not found in {0} cancer dataset")]
    TargetNotFound(CancerType),

    #[error("Unknown cancer type: {0}")]
    UnknownCancerType(String),

    #[error("Default dataset not found for {0}")]
    DatasetNotFound(CancerType),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for OncoriskError {
    fn from(err: polars::error::PolarsError) -> Self {
        OncoriskError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for OncoriskError {
    fn from(err: serde_json::Error) -> Self {
        OncoriskError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for OncoriskError {
    fn from(err: ndarray::ShapeError) -> Self {
        OncoriskError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OncoriskError::TargetNotFound(CancerType::Lung);
        assert_eq!(err.to_string(), "Target column not found in lung cancer dataset");

        let err = OncoriskError::ArtifactNotFound {
            kind: "Model",
            path: PathBuf::from("models/breast_cancer.pkl"),
        };
        assert_eq!(err.to_string(), "Model file not found: models/breast_cancer.pkl");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: OncoriskError = io_err.into();
        assert!(matches!(err, OncoriskError::IoError(_)));
    }
}
