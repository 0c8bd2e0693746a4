//! Trained classifier dispatch

use super::random_forest::RandomForest;
use super::svm::{SvmClassifier, SvmConfig};
use crate::cancer::ClassifierKind;
use crate::error::Result;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Seed shared by every stochastic step of training
pub const RANDOM_STATE: u64 = 42;

/// Enum to hold trained model variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrainedClassifier {
    SupportVector(SvmClassifier),
    RandomForest(RandomForest),
}

impl TrainedClassifier {
    /// Fit the classifier family chosen for a cancer type
    pub fn fit(kind: ClassifierKind, x: &Array2<f64>, y: &Array1<f64>) -> Result<Self> {
        match kind {
            ClassifierKind::SupportVector => {
                let mut svm = SvmClassifier::new(SvmConfig {
                    c: 1.0,
                    random_state: RANDOM_STATE,
                    ..Default::default()
                });
                svm.fit(x, y)?;
                Ok(TrainedClassifier::SupportVector(svm))
            }
            ClassifierKind::RandomForest => {
                let mut forest = RandomForest::new(100)
                    .with_max_depth(10)
                    .with_min_samples_split(5)
                    .with_random_state(RANDOM_STATE);
                forest.fit(x, y)?;
                Ok(TrainedClassifier::RandomForest(forest))
            }
        }
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            TrainedClassifier::SupportVector(m) => m.predict(x),
            TrainedClassifier::RandomForest(m) => m.predict(x),
        }
    }

    /// Class probabilities, columns ordered as [`TrainedClassifier::classes`]
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        match self {
            TrainedClassifier::SupportVector(m) => m.predict_proba(x),
            TrainedClassifier::RandomForest(m) => m.predict_proba(x),
        }
    }

    pub fn classes(&self) -> &[f64] {
        match self {
            TrainedClassifier::SupportVector(m) => m.classes(),
            TrainedClassifier::RandomForest(m) => m.classes(),
        }
    }

    /// Model family name reported with predictions
    pub fn model_type(&self) -> &'static str {
        match self {
            TrainedClassifier::SupportVector(_) => "SVC",
            TrainedClassifier::RandomForest(_) => "RandomForestClassifier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn data() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [0.0, 0.1],
            [0.2, 0.0],
            [0.1, 0.3],
            [0.3, 0.2],
            [0.2, 0.2],
            [2.0, 2.1],
            [2.2, 1.9],
            [1.9, 2.3],
            [2.1, 2.0],
            [2.3, 2.2],
        ];
        let y = array![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        (x, y)
    }

    #[test]
    fn test_dispatch() {
        let (x, y) = data();
        for kind in [ClassifierKind::SupportVector, ClassifierKind::RandomForest] {
            let model = TrainedClassifier::fit(kind, &x, &y).unwrap();
            assert_eq!(model.classes(), &[0.0, 1.0]);
            assert_eq!(model.predict(&x).unwrap(), y);
            assert_eq!(model.predict_proba(&x).unwrap().dim(), (10, 2));
        }
    }

    #[test]
    fn test_serde_roundtrip_keeps_predictions() {
        let (x, y) = data();
        let model = TrainedClassifier::fit(ClassifierKind::RandomForest, &x, &y).unwrap();
        let json = serde_json::to_vec(&model).unwrap();
        let restored: TrainedClassifier = serde_json::from_slice(&json).unwrap();
        assert_eq!(restored.model_type(), "RandomForestClassifier");
        let before = model.predict_proba(&x).unwrap();
        let after = restored.predict_proba(&x).unwrap();
        for (a, b) in before.iter().zip(after.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
