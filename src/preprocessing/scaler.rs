//! Feature scaling

use crate::error::{OncoriskError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Standard scaling (z-score normalization): (x - mean) / std.
///
/// Uses the population standard deviation; constant columns get a scale of 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
    n_features: usize,
    is_fitted: bool,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            mean: Array1::zeros(0),
            scale: Array1::zeros(0),
            n_features: 0,
            is_fitted: false,
        }
    }

    /// Fit the scaler to the data
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(OncoriskError::InvalidInput(
                "cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| OncoriskError::InvalidInput("empty matrix".to_string()))?;
        let std = x.std_axis(Axis(0), 0.0);

        self.scale = std.mapv(|s| if s == 0.0 || !s.is_finite() { 1.0 } else { s });
        self.mean = mean;
        self.n_features = x.ncols();
        self.is_fitted = true;
        Ok(self)
    }

    /// Transform the data
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(OncoriskError::ModelNotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(OncoriskError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok((x - &self.mean) / &self.scale)
    }

    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }
}
