//! Engine facade
//!
//! Binds an [`EngineConfig`] to the training, store and inference functions
//! so callers deal in cancer types instead of artifact paths.

use crate::cancer::CancerType;
use crate::config::EngineConfig;
use crate::error::{OncoriskError, Result};
use crate::inference::{predict_batch, predict_single, ModelInfo, PredictionResult};
use crate::store::{load_metadata, model_exists, model_status, save_metadata, ModelStatus};
use crate::training::{Trainer, TrainingMetrics};
use crate::utils::DataSaver;
use polars::prelude::DataFrame;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Entry point for training, prediction and status queries
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Dataset used when training is not given an explicit file
    pub fn default_data_path(&self, cancer_type: CancerType) -> Result<PathBuf> {
        self.config.default_data_path(cancer_type)
    }

    /// Train, persist the artifacts and record the metadata
    pub fn train(&self, cancer_type: CancerType, data_path: Option<&Path>) -> Result<TrainingMetrics> {
        let data_path = match data_path {
            Some(path) => path.to_path_buf(),
            None => self.default_data_path(cancer_type)?,
        };

        let paths = self.config.artifact_paths(cancer_type);
        let metrics = Trainer::new(cancer_type).train(&data_path, &paths.model, &paths.scaler)?;
        save_metadata(cancer_type, &metrics, &self.config.model_dir)?;
        Ok(metrics)
    }

    /// Predict one record and attach the training details of the model used
    pub fn predict(&self, cancer_type: CancerType, fields: &Map<String, Value>) -> Result<PredictionResult> {
        self.ensure_trained(cancer_type)?;
        if fields.is_empty() {
            return Err(OncoriskError::InvalidInput("No input data provided".to_string()));
        }

        let paths = self.config.artifact_paths(cancer_type);
        let mut result = predict_single(cancer_type, fields, &paths.model, &paths.scaler)?;

        let metadata = match load_metadata(cancer_type, &self.config.model_dir) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!(cancer_type = %cancer_type, error = %e, "Unreadable metadata");
                None
            }
        };
        let metadata = metadata.as_ref();
        result.model_info = Some(ModelInfo {
            trained_at: metadata.and_then(|m| m.trained_at.clone()),
            accuracy: metadata.and_then(|m| m.metrics.as_ref()).map(|m| m.accuracy),
            model_type: result.model_type.clone(),
        });

        Ok(result)
    }

    /// Predict every row of a CSV file
    pub fn predict_batch(&self, cancer_type: CancerType, csv_path: impl AsRef<Path>) -> Result<DataFrame> {
        self.ensure_trained(cancer_type)?;
        let paths = self.config.artifact_paths(cancer_type);
        predict_batch(cancer_type, csv_path, &paths.model, &paths.scaler)
    }

    /// Predict every row of a CSV file and write the result as CSV.
    ///
    /// Without an explicit `output` the file lands in the upload directory as
    /// `predictions_<timestamp>_<input name>`. Returns the written path.
    pub fn predict_batch_to_file(
        &self,
        cancer_type: CancerType,
        csv_path: impl AsRef<Path>,
        output: Option<&Path>,
    ) -> Result<PathBuf> {
        let csv_path = csv_path.as_ref();
        let mut results = self.predict_batch(cancer_type, csv_path)?;

        let output = match output {
            Some(path) => path.to_path_buf(),
            None => self.batch_output_path(csv_path),
        };
        DataSaver::save_csv(&mut results, &output)?;
        info!(output = %output.display(), rows = results.height(), "Wrote batch predictions");
        Ok(output)
    }

    pub fn status(&self, cancer_type: CancerType) -> Result<ModelStatus> {
        model_status(cancer_type, &self.config.model_dir)
    }

    /// Whether the model and scaler artifacts exist
    pub fn is_trained(&self, cancer_type: CancerType) -> bool {
        model_exists(cancer_type, &self.config.model_dir)
    }

    fn ensure_trained(&self, cancer_type: CancerType) -> Result<()> {
        if self.is_trained(cancer_type) {
            Ok(())
        } else {
            Err(OncoriskError::ModelNotTrained(cancer_type))
        }
    }

    fn batch_output_path(&self, csv_path: &Path) -> PathBuf {
        let name = csv_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "batch.csv".to_string());
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        self.config
            .upload_dir
            .join(format!("predictions_{}_{}", timestamp, name))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
