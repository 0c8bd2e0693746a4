//! Platt scaling (sigmoid calibration)

use crate::calibration::Calibrator;
use crate::error::{OncoriskError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Platt scaling calibrator
///
/// Fits a sigmoid on raw scores: P(y=1|f) = 1 / (1 + exp(-(A*f + B)))
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlattScaling {
    /// Slope parameter A
    a: Option<f64>,
    /// Intercept parameter B
    b: Option<f64>,
    /// Maximum Newton iterations
    max_iter: usize,
    /// Gradient norm at which the fit stops
    tol: f64,
}

impl PlattScaling {
    /// Create new Platt scaling calibrator
    pub fn new() -> Self {
        Self {
            a: None,
            b: None,
            max_iter: 100,
            tol: 1e-5,
        }
    }

    /// Get fitted parameters
    pub fn parameters(&self) -> Option<(f64, f64)> {
        match (self.a, self.b) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }

    /// Sigmoid function
    fn sigmoid(x: f64) -> f64 {
        if x >= 0.0 {
            1.0 / (1.0 + (-x).exp())
        } else {
            let e = x.exp();
            e / (1.0 + e)
        }
    }

    /// Cross-entropy of the sigmoid against soft targets
    fn loss(scores: &Array1<f64>, targets: &[f64], a: f64, b: f64) -> f64 {
        scores
            .iter()
            .zip(targets)
            .map(|(&f, &t)| {
                let z = a * f + b;
                // log(1 + e^z) - t*z, evaluated without overflow
                z.max(0.0) + (-z.abs()).exp().ln_1p() - t * z
            })
            .sum()
    }

    /// Probability for a single score
    pub fn calibrate_single(&self, score: f64) -> Result<f64> {
        let (a, b) = self.parameters().ok_or(OncoriskError::ModelNotFitted)?;
        Ok(Self::sigmoid(a * score + b))
    }
}

impl Default for PlattScaling {
    fn default() -> Self {
        Self::new()
    }
}

impl Calibrator for PlattScaling {
    fn fit(&mut self, scores: &Array1<f64>, labels: &Array1<f64>) -> Result<()> {
        let n = scores.len();
        if n != labels.len() {
            return Err(OncoriskError::InvalidInput(
                "Scores and labels must have same length".to_string(),
            ));
        }

        if n == 0 {
            return Err(OncoriskError::InvalidInput("Empty input".to_string()));
        }

        // Target values with Platt's adjustment against overfitting
        let n_pos = labels.iter().filter(|&&y| y > 0.5).count() as f64;
        let n_neg = n as f64 - n_pos;

        let target_pos = (n_pos + 1.0) / (n_pos + 2.0);
        let target_neg = 1.0 / (n_neg + 2.0);

        let targets: Vec<f64> = labels
            .iter()
            .map(|&y| if y > 0.5 { target_pos } else { target_neg })
            .collect();

        let mut a = 0.0;
        let mut b = ((n_pos + 1.0) / (n_neg + 1.0)).ln();
        let mut current = Self::loss(scores, &targets, a, b);

        // Newton's method with backtracking line search
        for _ in 0..self.max_iter {
            let mut grad_a = 0.0;
            let mut grad_b = 0.0;
            let mut hess_aa = 1e-12;
            let mut hess_ab = 0.0;
            let mut hess_bb = 1e-12;

            for (&f, &t) in scores.iter().zip(&targets) {
                let p = Self::sigmoid(a * f + b);
                let d1 = p - t;
                let d2 = p * (1.0 - p);

                grad_a += f * d1;
                grad_b += d1;

                hess_aa += f * f * d2;
                hess_ab += f * d2;
                hess_bb += d2;
            }

            if grad_a.abs() < self.tol && grad_b.abs() < self.tol {
                break;
            }

            // Solve 2x2 system using Cramer's rule
            let det = hess_aa * hess_bb - hess_ab * hess_ab;
            if det.abs() < 1e-15 {
                break;
            }

            let delta_a = (hess_bb * grad_a - hess_ab * grad_b) / det;
            let delta_b = (hess_aa * grad_b - hess_ab * grad_a) / det;

            let mut step = 1.0;
            let mut improved = false;
            while step >= 1e-10 {
                let next_a = a - step * delta_a;
                let next_b = b - step * delta_b;
                let next = Self::loss(scores, &targets, next_a, next_b);
                if next < current {
                    a = next_a;
                    b = next_b;
                    current = next;
                    improved = true;
                    break;
                }
                step /= 2.0;
            }

            if !improved {
                break;
            }
        }

        self.a = Some(a);
        self.b = Some(b);

        Ok(())
    }

    fn calibrate(&self, scores: &Array1<f64>) -> Result<Array1<f64>> {
        let (a, b) = self.parameters().ok_or(OncoriskError::ModelNotFitted)?;
        Ok(scores.mapv(|f| Self::sigmoid(a * f + b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_platt_scaling_basic() {
        let scores = array![-2.1, -0.4, -0.8, 1.3, 2.2, -1.5, 0.9, 0.2];
        let labels = array![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0];

        let mut calibrator = PlattScaling::new();
        calibrator.fit(&scores, &labels).unwrap();
        let calibrated = calibrator.calibrate(&scores).unwrap();

        assert_eq!(calibrated.len(), scores.len());
        assert!(calibrated.iter().all(|&p| (0.0..=1.0).contains(&p)));
        // larger decision values mean higher positive probability
        let (a, _) = calibrator.parameters().unwrap();
        assert!(a > 0.0);
        assert!(calibrated[4] > calibrated[0]);
    }

    #[test]
    fn test_calibrate_before_fit() {
        let calibrator = PlattScaling::new();
        assert!(matches!(
            calibrator.calibrate(&array![0.5]),
            Err(OncoriskError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let mut calibrator = PlattScaling::new();
        assert!(calibrator.fit(&array![1.0, 2.0], &array![1.0]).is_err());
    }
}
