//! Model artifact storage
//!
//! Each cancer type owns four files under the model directory: the fitted
//! classifier, the scaler, the feature-name list and a metadata record.
//! Artifacts are JSON documents; the `.pkl` names are kept so existing
//! deployments find their files where they expect them.

mod metadata;

pub use metadata::{load_metadata, model_exists, model_status, save_metadata, ModelMetadata, ModelStatus};

use crate::cancer::CancerType;
use crate::error::{OncoriskError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File locations of one cancer type's artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub metadata: PathBuf,
    pub features: PathBuf,
}

impl ArtifactPaths {
    pub fn new(base_dir: impl AsRef<Path>, cancer_type: CancerType) -> Self {
        let base = base_dir.as_ref();
        let stem = format!("{}_cancer", cancer_type.as_str());
        let model = base.join(format!("{stem}.pkl"));
        Self {
            features: features_path_for(&model),
            scaler: base.join(format!("{stem}_scaler.pkl")),
            metadata: base.join(format!("{stem}_metadata.json")),
            model,
        }
    }
}

/// The feature list lives next to the model as `<model stem>_features.<ext>`
pub fn features_path_for(model_path: &Path) -> PathBuf {
    let stem = model_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match model_path.extension() {
        Some(ext) => format!("{}_features.{}", stem, ext.to_string_lossy()),
        None => format!("{}_features", stem),
    };
    model_path.with_file_name(name)
}

/// Serialize a value to JSON bytes
pub fn encode_artifact<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// A fully written and synced temporary file waiting to replace its target.
/// Dropping it without [`StagedFile::commit`] removes the temporary file.
#[derive(Debug)]
pub struct StagedFile {
    tmp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    /// Rename the temporary file over the target
    pub fn commit(self) -> Result<()> {
        self.tmp
            .persist(&self.target)
            .map_err(|e| OncoriskError::IoError(e.error))?;
        Ok(())
    }
}

/// Write bytes to a temporary file in the destination directory
pub fn stage(path: &Path, bytes: &[u8]) -> Result<StagedFile> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    Ok(StagedFile {
        tmp,
        target: path.to_path_buf(),
    })
}

/// Write bytes through a temporary file and rename it over the target, so
/// readers never see a partial file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    stage(path, bytes)?.commit()
}

/// Stage every file before renaming any of them. A failed write leaves all
/// targets as they were; only a failed rename can leave a mixed set.
pub fn write_all_atomic(files: &[(&Path, &[u8])]) -> Result<()> {
    let staged = files
        .iter()
        .map(|(path, bytes)| stage(path, bytes))
        .collect::<Result<Vec<StagedFile>>>()?;
    for file in staged {
        file.commit()?;
    }
    Ok(())
}

/// Serialize and atomically write an artifact
pub fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = encode_artifact(value)?;
    write_atomic(path, &bytes)
}

/// Read an artifact; a missing file reports which artifact `kind` is absent
pub fn read_artifact<T: DeserializeOwned>(path: &Path, kind: &'static str) -> Result<T> {
    if !path.exists() {
        return Err(OncoriskError::ArtifactNotFound {
            kind,
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        OncoriskError::SerializationError(format!("{} file {}: {}", kind, path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_artifact_paths() {
        let paths = ArtifactPaths::new("/srv/models", CancerType::Breast);
        assert_eq!(paths.model, PathBuf::from("/srv/models/breast_cancer.pkl"));
        assert_eq!(paths.scaler, PathBuf::from("/srv/models/breast_cancer_scaler.pkl"));
        assert_eq!(paths.metadata, PathBuf::from("/srv/models/breast_cancer_metadata.json"));
        assert_eq!(paths.features, PathBuf::from("/srv/models/breast_cancer_features.pkl"));
    }

    #[test]
    fn test_features_path_for() {
        assert_eq!(
            features_path_for(Path::new("out/custom.bin")),
            PathBuf::from("out/custom_features.bin")
        );
        assert_eq!(
            features_path_for(Path::new("model")),
            PathBuf::from("model_features")
        );
    }

    #[test]
    fn test_write_all_keeps_old_files_when_a_write_fails() {
        let dir = tempdir().unwrap();
        let model = dir.path().join("model.pkl");
        fs::write(&model, b"old").unwrap();
        // a regular file where the scaler's directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let scaler = blocker.join("scaler.pkl");

        let result = write_all_atomic(&[(model.as_path(), b"new".as_slice()), (scaler.as_path(), b"s".as_slice())]);
        assert!(result.is_err());
        assert_eq!(fs::read(&model).unwrap(), b"old");

        // no temporary files left behind
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_write_all_replaces_every_target() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.pkl");
        let b = dir.path().join("sub").join("b.pkl");
        fs::write(&a, b"old").unwrap();

        write_all_atomic(&[(a.as_path(), b"1".as_slice()), (b.as_path(), b"2".as_slice())]).unwrap();
        assert_eq!(fs::read(&a).unwrap(), b"1");
        assert_eq!(fs::read(&b).unwrap(), b"2");
    }

    #[test]
    fn test_write_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("names.pkl");
        let names = vec!["age".to_string(), "psa".to_string()];

        write_artifact(&path, &names).unwrap();
        let loaded: Vec<String> = read_artifact(&path, "Features").unwrap();
        assert_eq!(loaded, names);

        // overwrite in place
        write_artifact(&path, &vec!["gleason".to_string()]).unwrap();
        let loaded: Vec<String> = read_artifact(&path, "Features").unwrap();
        assert_eq!(loaded, vec!["gleason".to_string()]);
    }

    #[test]
    fn test_read_missing() {
        let dir = tempdir().unwrap();
        let err = read_artifact::<Vec<String>>(&dir.path().join("x.pkl"), "Scaler").unwrap_err();
        assert!(matches!(err, OncoriskError::ArtifactNotFound { kind: "Scaler", .. }));
    }

    #[test]
    fn test_read_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.pkl");
        fs::write(&path, b"not json").unwrap();
        let err = read_artifact::<Vec<String>>(&path, "Model").unwrap_err();
        assert!(matches!(err, OncoriskError::SerializationError(_)));
    }
}
