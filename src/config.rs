//! Engine configuration

use crate::cancer::CancerType;
use crate::error::{OncoriskError, Result};
use crate::store::ArtifactPaths;
use std::path::{Path, PathBuf};

/// Directories the engine works in.
///
/// Passed explicitly to every component; the defaults come from the
/// environment once, at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub model_dir: PathBuf,
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_dir: std::env::var("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./models")),
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./uploads")),
        }
    }
}

impl EngineConfig {
    /// Configuration rooted at explicit directories
    pub fn new(model_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            data_dir: data_dir.into(),
            upload_dir: PathBuf::from("./uploads"),
        }
    }

    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = dir.into();
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }

    /// Artifact locations for a cancer type under `model_dir`
    pub fn artifact_paths(&self, cancer_type: CancerType) -> ArtifactPaths {
        ArtifactPaths::new(&self.model_dir, cancer_type)
    }

    /// Locate the bundled dataset for a cancer type.
    ///
    /// Checks `data_dir` first, then the parent and grandparent of the
    /// working directory.
    pub fn default_data_path(&self, cancer_type: CancerType) -> Result<PathBuf> {
        let file = cancer_type.default_dataset_file();
        let candidates = [
            self.data_dir.join(file),
            Path::new("..").join(file),
            Path::new("..").join("..").join(file),
        ];

        candidates
            .into_iter()
            .find(|p| p.exists())
            .ok_or(OncoriskError::DatasetNotFound(cancer_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = EngineConfig::new("/tmp/models", "/tmp/data").with_upload_dir("/tmp/up");
        assert_eq!(config.model_dir, PathBuf::from("/tmp/models"));
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/up"));
        assert_eq!(
            config.artifact_paths(CancerType::Lung).model,
            PathBuf::from("/tmp/models/lung_cancer.pkl")
        );
    }

    #[test]
    fn test_default_data_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::new(dir.path().join("models"), dir.path());

        let missing = config.default_data_path(CancerType::Prostate);
        assert!(matches!(missing, Err(OncoriskError::DatasetNotFound(CancerType::Prostate))));

        std::fs::write(dir.path().join("prostat_cancer.csv"), "a,b\n1,2\n").unwrap();
        let found = config.default_data_path(CancerType::Prostate).unwrap();
        assert_eq!(found, dir.path().join("prostat_cancer.csv"));
    }
}
