//! Per-dataset preprocessing pipeline

use super::{is_numeric_dtype, numeric_column, LabelEncoder, MeanImputer, ID_COLUMNS};
use crate::cancer::CancerType;
use crate::error::{OncoriskError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use tracing::debug;

/// Whether the table must carry a target column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareMode {
    /// Target required; rows with a missing target are dropped
    Training,
    /// Target optional and discarded; every row is kept
    Batch,
}

/// Output of the preprocessor
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// Feature columns in matrix order
    pub feature_names: Vec<String>,
    /// Dense feature matrix, no missing values
    pub x: Array2<f64>,
    /// Encoded target (training mode only)
    pub y: Option<Array1<f64>>,
    /// Target encoder, when the target was label-encoded
    pub label_encoder: Option<LabelEncoder>,
}

impl PreparedData {
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }
}

/// Cleans and encodes a raw table for one cancer type
#[derive(Debug, Clone, Copy)]
pub struct CancerPreprocessor {
    cancer_type: CancerType,
}

impl CancerPreprocessor {
    pub fn new(cancer_type: CancerType) -> Self {
        Self { cancer_type }
    }

    pub fn cancer_type(&self) -> CancerType {
        self.cancer_type
    }

    /// First target candidate present in the table
    pub fn find_target(&self, df: &DataFrame) -> Option<String> {
        let names = df.get_column_names();
        self.cancer_type
            .target_candidates()
            .iter()
            .find(|c| names.iter().any(|n| n.as_str() == **c))
            .map(|c| c.to_string())
    }

    /// Prepare a table in the given mode
    pub fn prepare(&self, df: &DataFrame, mode: PrepareMode) -> Result<PreparedData> {
        let target = self.find_target(df);

        let df = match (mode, &target) {
            (PrepareMode::Training, None) => {
                return Err(OncoriskError::TargetNotFound(self.cancer_type))
            }
            (PrepareMode::Training, Some(name)) => {
                let mask = df.column(name)?.as_materialized_series().is_not_null();
                let filtered = df.filter(&mask)?;
                let dropped = df.height() - filtered.height();
                if dropped > 0 {
                    debug!(dropped, column = %name, "Dropped rows with missing target");
                }
                filtered
            }
            (PrepareMode::Batch, _) => df.clone(),
        };

        if df.height() == 0 {
            return Err(OncoriskError::DataError(format!(
                "{} cancer dataset has no usable rows",
                self.cancer_type
            )));
        }

        let (y, label_encoder) = match (mode, &target) {
            (PrepareMode::Training, Some(name)) => {
                let (y, encoder) = self.encode_target(df.column(name)?.as_materialized_series())?;
                (Some(y), encoder)
            }
            _ => (None, None),
        };

        let candidate_names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .filter(|n| !ID_COLUMNS.contains(&n.as_str()))
            .filter(|n| Some(n) != target.as_ref())
            .collect();

        let mut columns = Vec::with_capacity(candidate_names.len());
        for name in &candidate_names {
            columns.push(self.encode_feature(df.column(name)?.as_materialized_series())?);
        }

        let mut imputer = MeanImputer::new();
        let columns = imputer.fit_transform(columns)?;

        let mut feature_names = Vec::with_capacity(candidate_names.len());
        let mut kept = Vec::with_capacity(candidate_names.len());
        for (i, (name, col)) in candidate_names.into_iter().zip(columns).enumerate() {
            if imputer.fill_value(i).is_none() {
                debug!(column = %name, "Dropping column with no observed values");
                continue;
            }
            feature_names.push(name);
            kept.push(col);
        }

        if feature_names.is_empty() {
            return Err(OncoriskError::DataError(format!(
                "{} cancer dataset has no usable feature columns",
                self.cancer_type
            )));
        }

        let n_rows = df.height();
        let x = Array2::from_shape_fn((n_rows, kept.len()), |(i, j)| kept[j][i].unwrap_or(0.0));

        Ok(PreparedData {
            feature_names,
            x,
            y,
            label_encoder,
        })
    }

    /// Training mode preparation
    pub fn fit_transform(&self, df: &DataFrame) -> Result<PreparedData> {
        self.prepare(df, PrepareMode::Training)
    }

    /// Batch-prediction mode preparation
    pub fn transform_batch(&self, df: &DataFrame) -> Result<PreparedData> {
        self.prepare(df, PrepareMode::Batch)
    }

    fn encode_target(&self, series: &Series) -> Result<(Array1<f64>, Option<LabelEncoder>)> {
        let encode = self.cancer_type.always_encode_target() || !is_numeric_dtype(series.dtype());

        let (values, encoder) = if encode {
            let mut encoder = LabelEncoder::new();
            let codes = encoder.fit_transform(series)?;
            debug!(classes = ?encoder.classes(), "Encoded target");
            (codes, Some(encoder))
        } else {
            (numeric_column(series)?, None)
        };

        let y = values
            .into_iter()
            .map(|v| {
                v.ok_or_else(|| {
                    OncoriskError::DataError(format!(
                        "target column '{}' has a missing value",
                        series.name()
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok((Array1::from_vec(y), encoder))
    }

    fn encode_feature(&self, series: &Series) -> Result<Vec<Option<f64>>> {
        if self.cancer_type.encodes_categorical_features() && !is_numeric_dtype(series.dtype()) {
            LabelEncoder::new().fit_transform(series)
        } else {
            numeric_column(series)
        }
    }
}
