//! Prediction from persisted artifacts
//!
//! A [`Predictor`] owns one cancer type's classifier, scaler and feature
//! list. Inputs are aligned to the stored feature list before scaling:
//! missing features become 0, unknown ones are dropped.

use super::mapping::map_fields;
use super::InferenceConfig;
use crate::cancer::CancerType;
use crate::error::{OncoriskError, Result};
use crate::preprocessing::{CancerPreprocessor, StandardScaler};
use crate::store::{features_path_for, read_artifact};
use crate::training::TrainedClassifier;
use crate::utils::DataLoader;
use ndarray::{concatenate, Array1, Array2, ArrayView1, Axis};
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Training details attached to a prediction by the engine facade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub trained_at: Option<String>,
    pub accuracy: Option<f64>,
    pub model_type: String,
}

/// Outcome of a single-record prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Human readable label
    pub prediction: String,
    pub prediction_code: i64,
    /// Highest class probability as a percentage, two decimals
    pub confidence: f64,
    /// Probability per class code
    pub probabilities: BTreeMap<String, f64>,
    pub model_type: String,
    pub features_used: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelInfo>,
}

/// Loaded artifact set for one cancer type
#[derive(Debug, Clone)]
pub struct Predictor {
    cancer_type: CancerType,
    classifier: TrainedClassifier,
    scaler: StandardScaler,
    feature_names: Vec<String>,
    config: InferenceConfig,
}

impl Predictor {
    /// Load the model, the scaler and the feature list stored next to the model
    pub fn load(
        cancer_type: CancerType,
        model_path: impl AsRef<Path>,
        scaler_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();
        let scaler_path = scaler_path.as_ref();

        let classifier: TrainedClassifier = read_artifact(model_path, "Model")?;
        let scaler: StandardScaler = read_artifact(scaler_path, "Scaler")?;
        let feature_names: Vec<String> = read_artifact(&features_path_for(model_path), "Features")?;

        if feature_names.len() != scaler.n_features() {
            return Err(OncoriskError::ShapeError {
                expected: format!("{} features", scaler.n_features()),
                actual: format!("{} feature names", feature_names.len()),
            });
        }

        debug!(
            cancer_type = %cancer_type,
            model_type = classifier.model_type(),
            features = feature_names.len(),
            "Loaded artifacts"
        );

        Ok(Self {
            cancer_type,
            classifier,
            scaler,
            feature_names,
            config: InferenceConfig::default(),
        })
    }

    pub fn with_config(mut self, config: InferenceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cancer_type(&self) -> CancerType {
        self.cancer_type
    }

    /// Feature columns in the order the model expects
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn model_type(&self) -> &'static str {
        self.classifier.model_type()
    }

    /// Predict one record of form fields
    pub fn predict_record(&self, fields: &Map<String, Value>) -> Result<PredictionResult> {
        let mapped = map_fields(self.cancer_type, fields)?;
        let row: Vec<f64> = self
            .feature_names
            .iter()
            .map(|name| mapped.get(name).copied().unwrap_or(0.0))
            .collect();
        let x = Array2::from_shape_vec((1, row.len()), row)?;

        let (codes, proba) = self.score(&x)?;
        let code = class_code(codes[0]);
        let row = proba.row(0);

        let probabilities = self
            .classifier
            .classes()
            .iter()
            .zip(row.iter())
            .map(|(&class, &p)| (class_code(class).to_string(), p))
            .collect();

        Ok(PredictionResult {
            prediction: self.cancer_type.label_for_code(code).to_string(),
            prediction_code: code,
            confidence: confidence(row),
            probabilities,
            model_type: self.model_type().to_string(),
            features_used: self.feature_names.len(),
            model_info: None,
        })
    }

    /// Predict every row of a table, returning the table with `prediction`,
    /// `prediction_code` and `confidence` appended
    pub fn predict_frame(&self, df: &DataFrame) -> Result<DataFrame> {
        let prepared = CancerPreprocessor::new(self.cancer_type).transform_batch(df)?;
        let x = align_features(&self.feature_names, &prepared.feature_names, &prepared.x);
        let (codes, proba) = self.score(&x)?;

        let codes: Vec<i64> = codes.iter().map(|&c| class_code(c)).collect();
        let labels: Vec<&str> = codes.iter().map(|&c| self.cancer_type.label_for_code(c)).collect();
        let confidences: Vec<f64> = proba.rows().into_iter().map(confidence).collect();

        let mut out = df.clone();
        out.with_column(Series::new("prediction".into(), labels))?;
        out.with_column(Series::new("prediction_code".into(), codes))?;
        out.with_column(Series::new("confidence".into(), confidences))?;
        Ok(out)
    }

    /// Scale, then predict codes and class probabilities
    fn score(&self, x: &Array2<f64>) -> Result<(Array1<f64>, Array2<f64>)> {
        if !self.config.should_use_parallel(x.nrows()) {
            return self.score_chunk(x);
        }

        let chunks: Vec<_> = x.axis_chunks_iter(Axis(0), self.config.batch_size).collect();
        let results = chunks
            .par_iter()
            .map(|chunk| self.score_chunk(&chunk.to_owned()))
            .collect::<Result<Vec<_>>>()?;

        let code_views: Vec<_> = results.iter().map(|(c, _)| c.view()).collect();
        let proba_views: Vec<_> = results.iter().map(|(_, p)| p.view()).collect();
        Ok((concatenate(Axis(0), &code_views)?, concatenate(Axis(0), &proba_views)?))
    }

    fn score_chunk(&self, x: &Array2<f64>) -> Result<(Array1<f64>, Array2<f64>)> {
        let scaled = self.scaler.transform(x)?;
        let codes = self.classifier.predict(&scaled)?;
        let proba = self.classifier.predict_proba(&scaled)?;
        Ok((codes, proba))
    }
}

/// Reorder columns to `expected`, filling absent ones with 0
fn align_features(expected: &[String], names: &[String], x: &Array2<f64>) -> Array2<f64> {
    let positions: Vec<Option<usize>> = expected
        .iter()
        .map(|name| names.iter().position(|n| n == name))
        .collect();

    Array2::from_shape_fn((x.nrows(), expected.len()), |(i, j)| match positions[j] {
        Some(src) => x[[i, src]],
        None => 0.0,
    })
}

fn class_code(class: f64) -> i64 {
    class.round() as i64
}

/// Highest probability as a percentage rounded to two decimals
fn confidence(probabilities: ArrayView1<f64>) -> f64 {
    let max = probabilities.iter().copied().fold(0.0_f64, f64::max);
    (max * 100.0 * 100.0).round() / 100.0
}

/// Predict one record with the artifacts at the given paths
pub fn predict_single(
    cancer_type: CancerType,
    fields: &Map<String, Value>,
    model_path: impl AsRef<Path>,
    scaler_path: impl AsRef<Path>,
) -> Result<PredictionResult> {
    let start = Instant::now();
    let result = Predictor::load(cancer_type, model_path, scaler_path)?.predict_record(fields)?;
    info!(
        cancer_type = %cancer_type,
        prediction = %result.prediction,
        confidence = result.confidence,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Prediction finished"
    );
    Ok(result)
}

/// Predict every row of the CSV at `csv_path`
pub fn predict_batch(
    cancer_type: CancerType,
    csv_path: impl AsRef<Path>,
    model_path: impl AsRef<Path>,
    scaler_path: impl AsRef<Path>,
) -> Result<DataFrame> {
    let start = Instant::now();
    let predictor = Predictor::load(cancer_type, model_path, scaler_path)?;
    let df = DataLoader::new().load_csv(csv_path.as_ref())?;
    let out = predictor.predict_frame(&df)?;
    info!(
        cancer_type = %cancer_type,
        rows = out.height(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Batch prediction finished"
    );
    Ok(out)
}
