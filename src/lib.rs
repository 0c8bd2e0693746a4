//! oncorisk - Cancer risk classification engine
//!
//! Trains and serves one classifier per cancer type (breast, lung,
//! prostate) from tabular clinical datasets:
//! - Per-dataset preprocessing, encoding and imputation
//! - Stratified hold-out training with SVM or Random Forest
//! - Flat-file artifact store with atomic writes
//! - Single-record and CSV batch prediction
//!
//! # Modules
//!
//! ## Core ML Modules
//! - [`preprocessing`] - Target/feature encoding, imputation, scaling
//! - [`training`] - Classifiers, splitting, metrics, training runs
//! - [`calibration`] - Platt scaling for SVM probabilities
//! - [`inference`] - Prediction from persisted artifacts
//!
//! ## Storage and Services
//! - [`store`] - Artifact paths, persistence and metadata
//! - [`engine`] - Facade bound to an [`EngineConfig`]
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Per-type dispatch and configuration
pub mod cancer;
pub mod config;

// Core ML modules
pub mod preprocessing;
pub mod training;
pub mod calibration;
pub mod inference;

// Storage and services
pub mod store;
pub mod engine;
pub mod cli;

// Utilities
pub mod utils;

pub use cancer::CancerType;
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{OncoriskError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{OncoriskError, Result};

    // Dispatch and configuration
    pub use crate::cancer::{CancerType, ClassifierKind};
    pub use crate::config::EngineConfig;
    pub use crate::engine::Engine;

    // Preprocessing
    pub use crate::preprocessing::{CancerPreprocessor, LabelEncoder, PreparedData, StandardScaler};

    // Training
    pub use crate::training::{train, Trainer, TrainedClassifier, TrainingMetrics};

    // Calibration
    pub use crate::calibration::{Calibrator, PlattScaling};

    // Inference
    pub use crate::inference::{predict_batch, predict_single, InferenceConfig, PredictionResult, Predictor};

    // Store
    pub use crate::store::{model_exists, model_status, ModelMetadata, ModelStatus};
}
