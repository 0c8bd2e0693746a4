//! Training engine implementation

use super::classifier::{TrainedClassifier, RANDOM_STATE};
use super::metrics::{accuracy_score, weighted_scores, TrainingMetrics};
use super::split::SplitConfig;
use crate::cancer::CancerType;
use crate::error::{OncoriskError, Result};
use crate::preprocessing::{CancerPreprocessor, StandardScaler};
use crate::store::{encode_artifact, features_path_for, write_all_atomic};
use crate::utils::DataLoader;
use ndarray::Axis;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Fits and persists the classifier for one cancer type
#[derive(Debug, Clone)]
pub struct Trainer {
    cancer_type: CancerType,
    split: SplitConfig,
    loader_rows: Option<usize>,
}

impl Trainer {
    pub fn new(cancer_type: CancerType) -> Self {
        Self {
            cancer_type,
            split: SplitConfig::default().with_random_state(RANDOM_STATE),
            loader_rows: None,
        }
    }

    /// Override the hold-out split
    pub fn with_split(mut self, split: SplitConfig) -> Self {
        self.split = split;
        self
    }

    /// Limit CSV schema inference to the first `rows` rows
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.loader_rows = Some(rows);
        self
    }

    /// Run the full pipeline: load, preprocess, split, scale, fit, evaluate,
    /// persist. Nothing is written unless every earlier step succeeded.
    pub fn train(
        &self,
        data_path: impl AsRef<Path>,
        model_path: impl AsRef<Path>,
        scaler_path: impl AsRef<Path>,
    ) -> Result<TrainingMetrics> {
        let start = Instant::now();
        let data_path = data_path.as_ref();
        let model_path = model_path.as_ref();
        let scaler_path = scaler_path.as_ref();

        info!(cancer_type = %self.cancer_type, data = %data_path.display(), "Training started");

        let mut loader = DataLoader::new();
        if let Some(rows) = self.loader_rows {
            loader = loader.with_infer_schema_length(rows);
        }
        let df = loader.load_csv(data_path)?;
        debug!(rows = df.height(), columns = df.width(), "Loaded dataset");

        let prepared = CancerPreprocessor::new(self.cancer_type).fit_transform(&df)?;
        let y = prepared
            .y
            .ok_or_else(|| OncoriskError::TrainingError("preprocessing produced no target".to_string()))?;

        let split = self.split.split(&y)?;
        let x_train = prepared.x.select(Axis(0), &split.train_indices);
        let x_test = prepared.x.select(Axis(0), &split.test_indices);
        let y_train = y.select(Axis(0), &split.train_indices);
        let y_test = y.select(Axis(0), &split.test_indices);

        let mut scaler = StandardScaler::new();
        let x_train = scaler.fit_transform(&x_train)?;
        let x_test = scaler.transform(&x_test)?;

        let classifier = TrainedClassifier::fit(self.cancer_type.classifier_kind(), &x_train, &y_train)?;

        let y_pred = classifier.predict(&x_test)?;
        let scores = weighted_scores(&y_test, &y_pred);

        let metrics = TrainingMetrics {
            accuracy: accuracy_score(&y_test, &y_pred),
            precision: scores.precision,
            recall: scores.recall,
            f1_score: scores.f1_score,
            training_samples: split.train_indices.len(),
            test_samples: split.test_indices.len(),
            features: prepared.feature_names.len(),
            trained_at: chrono::Utc::now().to_rfc3339(),
        };

        let model_bytes = encode_artifact(&classifier)?;
        let scaler_bytes = encode_artifact(&scaler)?;
        let feature_bytes = encode_artifact(&prepared.feature_names)?;

        let features_path = features_path_for(model_path);
        write_all_atomic(&[
            (model_path, model_bytes.as_slice()),
            (scaler_path, scaler_bytes.as_slice()),
            (features_path.as_path(), feature_bytes.as_slice()),
        ])?;

        info!(
            cancer_type = %self.cancer_type,
            model_type = classifier.model_type(),
            accuracy = metrics.accuracy,
            f1_score = metrics.f1_score,
            training_samples = metrics.training_samples,
            test_samples = metrics.test_samples,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Training finished"
        );

        Ok(metrics)
    }
}

/// Train the classifier for `cancer_type` on the CSV at `data_path`
pub fn train(
    cancer_type: CancerType,
    data_path: impl AsRef<Path>,
    model_path: impl AsRef<Path>,
    scaler_path: impl AsRef<Path>,
) -> Result<TrainingMetrics> {
    Trainer::new(cancer_type).train(data_path, model_path, scaler_path)
}
