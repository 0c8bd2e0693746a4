//! Cancer type dispatch
//!
//! Everything that differs between the three datasets hangs off [`CancerType`]:
//! target column candidates, encoding rules, classifier choice, label table and
//! default dataset file.

use crate::error::{OncoriskError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label reported for prediction codes outside the per-type table
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Supported cancer types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancerType {
    Breast,
    Lung,
    Prostate,
}

/// Classifier family fitted for a cancer type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifierKind {
    /// RBF support vector classifier with calibrated probabilities
    SupportVector,
    /// Random forest (100 trees, depth 10, min split 5)
    RandomForest,
}

impl CancerType {
    /// All cancer types in a stable order
    pub const ALL: [CancerType; 3] = [CancerType::Breast, CancerType::Lung, CancerType::Prostate];

    /// Lower-case name used in file names and metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            CancerType::Breast => "breast",
            CancerType::Lung => "lung",
            CancerType::Prostate => "prostate",
        }
    }

    /// Target column names, tried in order
    pub fn target_candidates(&self) -> &'static [&'static str] {
        match self {
            CancerType::Breast => &["diagnosis", "Diagnosis", "target", "Target", "class", "Class"],
            CancerType::Lung => &["LUNG_CANCER", "Lung_cancer", "lung_cancer", "target", "Target", "diagnosis"],
            CancerType::Prostate => &["target", "Target", "diagnosis", "Diagnosis", "result", "Result"],
        }
    }

    /// Whether the target is label-encoded even when it is already numeric
    pub fn always_encode_target(&self) -> bool {
        matches!(self, CancerType::Breast)
    }

    /// Whether non-numeric feature columns are label-encoded
    pub fn encodes_categorical_features(&self) -> bool {
        matches!(self, CancerType::Lung)
    }

    pub fn classifier_kind(&self) -> ClassifierKind {
        match self {
            CancerType::Breast => ClassifierKind::SupportVector,
            CancerType::Lung | CancerType::Prostate => ClassifierKind::RandomForest,
        }
    }

    /// Human readable label for a prediction code.
    ///
    /// The lung and prostate tables mirror the datasets' usual conventions but
    /// have not been validated against the label semantics of every source.
    pub fn label_for_code(&self, code: i64) -> &'static str {
        let label = match (self, code) {
            (CancerType::Breast, 0) => Some("Benign"),
            (CancerType::Breast, 1) => Some("Malignant"),
            (CancerType::Lung, 0) => Some("No"),
            (CancerType::Lung, 1) => Some("Yes"),
            (CancerType::Prostate, 0) => Some("Low Risk"),
            (CancerType::Prostate, 1) => Some("High Risk"),
            _ => None,
        };
        label.unwrap_or(UNKNOWN_LABEL)
    }

    /// Every label a prediction for this type can carry
    pub fn labels(&self) -> [&'static str; 3] {
        [self.label_for_code(0), self.label_for_code(1), UNKNOWN_LABEL]
    }

    /// File name of the bundled default dataset
    pub fn default_dataset_file(&self) -> &'static str {
        match self {
            CancerType::Breast => "Breast_Cancer.csv",
            CancerType::Lung => "lung_cancer.csv",
            CancerType::Prostate => "prostat_cancer.csv",
        }
    }
}

impl fmt::Display for CancerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CancerType {
    type Err = OncoriskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "breast" => Ok(CancerType::Breast),
            "lung" => Ok(CancerType::Lung),
            "prostate" => Ok(CancerType::Prostate),
            _ => Err(OncoriskError::UnknownCancerType(s.to_string())),
        }
    }
}
