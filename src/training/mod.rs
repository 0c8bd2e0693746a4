//! Model training module
//!
//! Provides the classifiers and the end-to-end training run:
//! - Decision trees and Random Forests
//! - Support Vector Machines with calibrated probabilities
//! - Stratified hold-out splitting
//! - Support-weighted evaluation metrics

mod classifier;
mod engine;
pub mod decision_tree;
pub mod metrics;
pub mod random_forest;
pub mod split;
pub mod svm;

pub use classifier::{TrainedClassifier, RANDOM_STATE};
pub use decision_tree::{DecisionTree, TreeNode};
pub use engine::{train, Trainer};
pub use metrics::{accuracy_score, weighted_scores, TrainingMetrics, WeightedScores};
pub use random_forest::RandomForest;
pub use split::{SplitConfig, TrainTestSplit};
pub use svm::{SvmClassifier, SvmConfig};
