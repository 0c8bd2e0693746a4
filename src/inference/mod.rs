//! Inference module
//!
//! Serves predictions from the artifacts a training run persisted:
//! - Form-field mapping per cancer type
//! - Feature alignment against the stored feature list
//! - Single-record and CSV batch prediction
//! - Chunked batch scoring via rayon

mod config;
mod engine;
mod mapping;

pub use config::InferenceConfig;
pub use engine::{predict_batch, predict_single, ModelInfo, PredictionResult, Predictor};
pub use mapping::map_fields;
