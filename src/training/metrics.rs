//! Evaluation metrics

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Hold-out evaluation of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub accuracy: f64,
    /// Support-weighted precision
    pub precision: f64,
    /// Support-weighted recall
    pub recall: f64,
    /// Support-weighted F1 score
    pub f1_score: f64,
    pub training_samples: usize,
    pub test_samples: usize,
    /// Number of feature columns the model was fit on
    pub features: usize,
    /// RFC 3339 timestamp of the run
    pub trained_at: String,
}

/// Support-weighted precision, recall and F1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScores {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// Fraction of exact matches
pub fn accuracy_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| (*t - *p).abs() < 1e-9)
        .count();
    correct as f64 / y_true.len() as f64
}

/// Per-label scores averaged with weights equal to each label's support.
///
/// Labels are the union of those seen in truth and prediction. Any ratio
/// with a zero denominator counts as 0.
pub fn weighted_scores(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> WeightedScores {
    let mut labels: Vec<f64> = y_true.iter().chain(y_pred.iter()).copied().collect();
    labels.sort_by(|a, b| a.total_cmp(b));
    labels.dedup();

    let mut total_support = 0usize;
    let mut precision = 0.0;
    let mut recall = 0.0;
    let mut f1 = 0.0;

    for &label in &labels {
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;

        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t == label, p == label) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }

        let support = tp + fn_;
        let p = ratio(tp, tp + fp);
        let r = ratio(tp, support);
        let f = if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 };

        precision += p * support as f64;
        recall += r * support as f64;
        f1 += f * support as f64;
        total_support += support;
    }

    if total_support == 0 {
        return WeightedScores {
            precision: 0.0,
            recall: 0.0,
            f1_score: 0.0,
        };
    }

    let total = total_support as f64;
    WeightedScores {
        precision: precision / total,
        recall: recall / total,
        f1_score: f1 / total,
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
