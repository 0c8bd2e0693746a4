//! Probability calibration
//!
//! Maps raw classifier scores (SVM decision values) to probabilities.

mod platt;

pub use platt::PlattScaling;

use crate::error::Result;
use ndarray::Array1;

/// Trait for score calibrators
pub trait Calibrator: Send + Sync {
    /// Fit the calibrator on raw scores and binary labels (1.0 = positive)
    fn fit(&mut self, scores: &Array1<f64>, labels: &Array1<f64>) -> Result<()>;

    /// Probability of the positive class for each score
    fn calibrate(&self, scores: &Array1<f64>) -> Result<Array1<f64>>;
}
