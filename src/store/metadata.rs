//! Training metadata records

use super::{read_artifact, write_artifact, ArtifactPaths};
use crate::cancer::CancerType;
use crate::error::Result;
use crate::training::TrainingMetrics;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Persisted record of the last training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub cancer_type: CancerType,
    pub metrics: Option<TrainingMetrics>,
    pub trained_at: Option<String>,
    pub model_exists: bool,
}

impl ModelMetadata {
    /// Record for a cancer type that has never been trained
    pub fn untrained(cancer_type: CancerType) -> Self {
        Self {
            cancer_type,
            metrics: None,
            trained_at: None,
            model_exists: false,
        }
    }
}

/// Training state reported to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub cancer_type: CancerType,
    pub is_trained: bool,
    pub metrics: Option<TrainingMetrics>,
    pub trained_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
}

/// Record a finished training run
pub fn save_metadata(
    cancer_type: CancerType,
    metrics: &TrainingMetrics,
    base_dir: impl AsRef<Path>,
) -> Result<ModelMetadata> {
    let paths = ArtifactPaths::new(base_dir, cancer_type);
    let metadata = ModelMetadata {
        cancer_type,
        metrics: Some(metrics.clone()),
        trained_at: Some(metrics.trained_at.clone()),
        model_exists: true,
    };

    write_artifact(&paths.metadata, &metadata)?;
    debug!(path = %paths.metadata.display(), "Saved metadata");
    Ok(metadata)
}

/// Load the metadata record, or the untrained record when none was saved.
///
/// `model_exists` always reflects the files on disk, not the stored flag.
pub fn load_metadata(cancer_type: CancerType, base_dir: impl AsRef<Path>) -> Result<ModelMetadata> {
    let base_dir = base_dir.as_ref();
    let paths = ArtifactPaths::new(base_dir, cancer_type);

    if !paths.metadata.exists() {
        return Ok(ModelMetadata::untrained(cancer_type));
    }

    let mut metadata: ModelMetadata = read_artifact(&paths.metadata, "Metadata")?;
    metadata.model_exists = paths.model.exists();
    Ok(metadata)
}

/// Whether both the model and the scaler artifacts are present
pub fn model_exists(cancer_type: CancerType, base_dir: impl AsRef<Path>) -> bool {
    let paths = ArtifactPaths::new(base_dir, cancer_type);
    paths.model.exists() && paths.scaler.exists()
}

pub fn model_status(cancer_type: CancerType, base_dir: impl AsRef<Path>) -> Result<ModelStatus> {
    let base_dir = base_dir.as_ref();
    let metadata = load_metadata(cancer_type, base_dir)?;
    let is_trained = model_exists(cancer_type, base_dir);

    Ok(ModelStatus {
        cancer_type,
        is_trained,
        metrics: metadata.metrics,
        trained_at: metadata.trained_at,
        model_path: is_trained.then(|| ArtifactPaths::new(base_dir, cancer_type).model),
    })
}
