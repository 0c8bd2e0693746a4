//! Support Vector Machine classifier
//!
//! SMO (Sequential Minimal Optimization) solver over an RBF kernel with
//! Platt-calibrated probability estimates. Multi-class problems use
//! one-vs-rest machines.

use crate::calibration::{Calibrator, PlattScaling};
use crate::error::{OncoriskError, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum number of samples for eager kernel matrix computation.
/// Beyond this, training will return an error to prevent OOM.
const MAX_KERNEL_MATRIX_SAMPLES: usize = 10_000;

/// SVM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvmConfig {
    /// Regularization parameter (C)
    pub c: f64,
    /// Tolerance for stopping criterion
    pub tol: f64,
    /// Maximum number of passes over the data
    pub max_iter: usize,
    /// Random seed
    pub random_state: u64,
    /// Folds used to collect out-of-sample decision values for calibration
    pub calibration_folds: usize,
}

impl Default for SvmConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tol: 1e-3,
            max_iter: 1000,
            random_state: 42,
            calibration_folds: 5,
        }
    }
}

/// One binary machine: positive class against the rest
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BinarySvm {
    support_vectors: Array2<f64>,
    /// alpha_i * y_i for every support vector
    coefficients: Array1<f64>,
    bias: f64,
}

/// Support Vector Classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvmClassifier {
    config: SvmConfig,
    /// Resolved kernel width
    gamma: f64,
    /// Sorted class values
    classes: Vec<f64>,
    /// One machine for binary problems (positive = classes[1]),
    /// one per class otherwise
    machines: Vec<BinarySvm>,
    /// Sigmoid calibrator per machine
    calibrators: Vec<PlattScaling>,
    n_features: usize,
    is_fitted: bool,
}

impl SvmClassifier {
    /// Create a new SVM classifier
    pub fn new(config: SvmConfig) -> Self {
        Self {
            config,
            gamma: 1.0,
            classes: Vec::new(),
            machines: Vec::new(),
            calibrators: Vec::new(),
            n_features: 0,
            is_fitted: false,
        }
    }

    /// Fit the classifier (supports binary and multi-class via One-vs-Rest)
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(OncoriskError::ShapeError {
                expected: format!("y length = {}", x.nrows()),
                actual: format!("y length = {}", y.len()),
            });
        }

        // Validate that all labels are integral values (no silent truncation)
        for (i, &v) in y.iter().enumerate() {
            if (v - v.round()).abs() > 1e-9 {
                return Err(OncoriskError::InvalidInput(format!(
                    "SVM classifier requires integer class labels, but sample {} has label {}",
                    i, v
                )));
            }
        }

        let mut classes: Vec<f64> = y.to_vec();
        classes.sort_by(|a, b| a.total_cmp(b));
        classes.dedup();

        if classes.len() < 2 {
            return Err(OncoriskError::TrainingError(
                "SVM requires at least 2 distinct classes".to_string(),
            ));
        }

        // "scale" width: 1 / (n_features * var(X))
        let var = x.var(0.0);
        self.gamma = if var > 0.0 {
            1.0 / (x.ncols() as f64 * var)
        } else {
            1.0
        };

        let positives: Vec<f64> = if classes.len() == 2 {
            vec![classes[1]]
        } else {
            classes.clone()
        };

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.random_state);
        let mut machines = Vec::with_capacity(positives.len());
        let mut calibrators = Vec::with_capacity(positives.len());

        for &positive in &positives {
            let y_binary = y.mapv(|v| if (v - positive).abs() < 1e-9 { 1.0 } else { -1.0 });

            let machine = self.train_machine(x, &y_binary, &mut rng)?;
            let scores = self.calibration_scores(x, &y_binary, &machine, &mut rng)?;

            let labels = y_binary.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
            let mut calibrator = PlattScaling::new();
            calibrator.fit(&scores, &labels)?;

            debug!(
                class = positive,
                support_vectors = machine.support_vectors.nrows(),
                "Trained SVM machine"
            );

            machines.push(machine);
            calibrators.push(calibrator);
        }

        self.classes = classes;
        self.machines = machines;
        self.calibrators = calibrators;
        self.n_features = x.ncols();
        self.is_fitted = true;
        Ok(())
    }

    /// Out-of-sample decision values for calibration.
    ///
    /// Falls back to in-sample scores when the data is too small to fold or
    /// a fold would lose one of the two labels.
    fn calibration_scores(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        full: &BinarySvm,
        rng: &mut Xoshiro256PlusPlus,
    ) -> Result<Array1<f64>> {
        let n = x.nrows();
        let folds = self.config.calibration_folds;

        let in_sample = || -> Array1<f64> {
            x.rows().into_iter().map(|row| self.score(full, row)).collect()
        };

        if folds < 2 || n < folds * 2 {
            return Ok(in_sample());
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);

        let mut scores = Array1::zeros(n);
        for fold in 0..folds {
            let mut held_out = Vec::with_capacity(n / folds + 1);
            let mut kept = Vec::with_capacity(n);
            for (pos, &idx) in order.iter().enumerate() {
                if pos % folds == fold {
                    held_out.push(idx);
                } else {
                    kept.push(idx);
                }
            }

            let y_kept = y.select(Axis(0), &kept);
            let has_both = y_kept.iter().any(|&v| v > 0.0) && y_kept.iter().any(|&v| v < 0.0);
            if !has_both {
                return Ok(in_sample());
            }

            let x_kept = x.select(Axis(0), &kept);
            let machine = self.train_machine(&x_kept, &y_kept, rng)?;
            for &idx in &held_out {
                scores[idx] = self.score(&machine, x.row(idx));
            }
        }

        Ok(scores)
    }

    /// SMO training of a single binary machine on labels in {-1, +1}
    fn train_machine(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        rng: &mut Xoshiro256PlusPlus,
    ) -> Result<BinarySvm> {
        let n = x.nrows();

        if n > MAX_KERNEL_MATRIX_SAMPLES {
            return Err(OncoriskError::TrainingError(format!(
                "Dataset has {} samples, exceeding the maximum {} for SVM kernel matrix",
                n, MAX_KERNEL_MATRIX_SAMPLES
            )));
        }

        let c = self.config.c;
        let tol = self.config.tol;
        let kernel_matrix = self.compute_kernel_matrix(x);

        let mut alphas: Array1<f64> = Array1::zeros(n);
        let mut bias = 0.0;

        let mut passes = 0;
        let max_passes = 5;
        let mut total_iter = 0;

        while n > 1 && passes < max_passes && total_iter < self.config.max_iter {
            let mut num_changed = 0;

            for i in 0..n {
                let e_i = Self::cached_output(&kernel_matrix, &alphas, y, bias, i) - y[i];

                // Check KKT conditions
                if (y[i] * e_i < -tol && alphas[i] < c) || (y[i] * e_i > tol && alphas[i] > 0.0) {
                    let j = loop {
                        let j = rng.gen_range(0..n);
                        if j != i {
                            break j;
                        }
                    };

                    let e_j = Self::cached_output(&kernel_matrix, &alphas, y, bias, j) - y[j];

                    let alpha_i_old = alphas[i];
                    let alpha_j_old = alphas[j];

                    let (l, h) = if y[i] != y[j] {
                        ((alpha_j_old - alpha_i_old).max(0.0), (c + alpha_j_old - alpha_i_old).min(c))
                    } else {
                        ((alpha_i_old + alpha_j_old - c).max(0.0), (alpha_i_old + alpha_j_old).min(c))
                    };

                    if (l - h).abs() < 1e-10 {
                        continue;
                    }

                    let eta = 2.0 * kernel_matrix[[i, j]] - kernel_matrix[[i, i]] - kernel_matrix[[j, j]];
                    if eta >= 0.0 {
                        continue;
                    }

                    alphas[j] = (alpha_j_old - y[j] * (e_i - e_j) / eta).clamp(l, h);

                    if (alphas[j] - alpha_j_old).abs() < 1e-5 {
                        continue;
                    }

                    alphas[i] = alpha_i_old + y[i] * y[j] * (alpha_j_old - alphas[j]);

                    let b1 = bias
                        - e_i
                        - y[i] * (alphas[i] - alpha_i_old) * kernel_matrix[[i, i]]
                        - y[j] * (alphas[j] - alpha_j_old) * kernel_matrix[[i, j]];

                    let b2 = bias
                        - e_j
                        - y[i] * (alphas[i] - alpha_i_old) * kernel_matrix[[i, j]]
                        - y[j] * (alphas[j] - alpha_j_old) * kernel_matrix[[j, j]];

                    bias = if alphas[i] > 0.0 && alphas[i] < c {
                        b1
                    } else if alphas[j] > 0.0 && alphas[j] < c {
                        b2
                    } else {
                        (b1 + b2) / 2.0
                    };

                    num_changed += 1;
                }
            }

            total_iter += 1;
            if num_changed == 0 {
                passes += 1;
            } else {
                passes = 0;
            }
        }

        let support: Vec<usize> = alphas
            .iter()
            .enumerate()
            .filter(|(_, &a)| a > 1e-8)
            .map(|(i, _)| i)
            .collect();

        let coefficients = support.iter().map(|&i| alphas[i] * y[i]).collect();

        Ok(BinarySvm {
            support_vectors: x.select(Axis(0), &support),
            coefficients,
            bias,
        })
    }

    /// Compute kernel matrix (parallelized for large datasets)
    fn compute_kernel_matrix(&self, x: &Array2<f64>) -> Array2<f64> {
        let n = x.nrows();
        let mut k = Array2::zeros((n, n));

        // For small matrices, sequential is faster due to overhead
        if n < 100 {
            for i in 0..n {
                for j in i..n {
                    let val = self.kernel(x.row(i), x.row(j));
                    k[[i, j]] = val;
                    k[[j, i]] = val;
                }
            }
            return k;
        }

        let rows: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| (i..n).map(|j| self.kernel(x.row(i), x.row(j))).collect())
            .collect();

        for (i, row_vals) in rows.into_iter().enumerate() {
            for (offset, val) in row_vals.into_iter().enumerate() {
                let j = i + offset;
                k[[i, j]] = val;
                k[[j, i]] = val;
            }
        }
        k
    }

    /// RBF kernel: exp(-gamma * ||a - b||^2)
    fn kernel(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        let norm_sq: f64 = a.iter().zip(b.iter()).map(|(p, q)| (p - q).powi(2)).sum();
        (-self.gamma * norm_sq).exp()
    }

    /// Machine output for training sample `idx` using the cached kernel matrix
    fn cached_output(k: &Array2<f64>, alphas: &Array1<f64>, y: &Array1<f64>, bias: f64, idx: usize) -> f64 {
        let mut sum = bias;
        for (i, &a) in alphas.iter().enumerate() {
            if a != 0.0 {
                sum += a * y[i] * k[[i, idx]];
            }
        }
        sum
    }

    fn score(&self, machine: &BinarySvm, sample: ArrayView1<f64>) -> f64 {
        machine
            .support_vectors
            .rows()
            .into_iter()
            .zip(machine.coefficients.iter())
            .map(|(sv, &coef)| coef * self.kernel(sample, sv))
            .sum::<f64>()
            + machine.bias
    }

    fn check_input(&self, x: &Array2<f64>) -> Result<()> {
        if !self.is_fitted {
            return Err(OncoriskError::ModelNotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(OncoriskError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(())
    }

    /// Decision values, one column per machine
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_input(x)?;

        let mut scores = Array2::zeros((x.nrows(), self.machines.len()));
        for (i, sample) in x.rows().into_iter().enumerate() {
            for (m, machine) in self.machines.iter().enumerate() {
                scores[[i, m]] = self.score(machine, sample);
            }
        }
        Ok(scores)
    }

    /// Predict class labels from the decision function
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let scores = self.decision_function(x)?;

        Ok(scores
            .rows()
            .into_iter()
            .map(|row| {
                if self.machines.len() == 1 {
                    if row[0] > 0.0 {
                        self.classes[1]
                    } else {
                        self.classes[0]
                    }
                } else {
                    let mut best = 0;
                    for (k, &s) in row.iter().enumerate() {
                        if s > row[best] {
                            best = k;
                        }
                    }
                    self.classes[best]
                }
            })
            .collect())
    }

    /// Calibrated class probabilities, one column per class
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let scores = self.decision_function(x)?;
        let n_classes = self.classes.len();
        let mut proba = Array2::zeros((x.nrows(), n_classes));

        for (i, row) in scores.rows().into_iter().enumerate() {
            if self.machines.len() == 1 {
                let p = self.calibrators[0].calibrate_single(row[0])?;
                proba[[i, 0]] = 1.0 - p;
                proba[[i, 1]] = p;
            } else {
                let mut total = 0.0;
                for (k, calibrator) in self.calibrators.iter().enumerate() {
                    let p = calibrator.calibrate_single(row[k])?;
                    proba[[i, k]] = p;
                    total += p;
                }
                for k in 0..n_classes {
                    proba[[i, k]] = if total > 0.0 {
                        proba[[i, k]] / total
                    } else {
                        1.0 / n_classes as f64
                    };
                }
            }
        }

        Ok(proba)
    }

    /// Sorted class values
    pub fn classes(&self) -> &[f64] {
        &self.classes
    }

    /// Resolved kernel width
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}
