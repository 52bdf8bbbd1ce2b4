//! Lazy-loading, process-wide holder of the single classifier artifact.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::CLASS_NAMES;
use crate::artifact::ModelArtifact;
use crate::error::MlError;

/// Single-slot model cache.
///
/// Constructed once at startup and shared by reference (no ambient global).
/// The slot is written at most once effectively: `load` runs under the write
/// guard, so concurrent first requests trigger a single filesystem read, and
/// every later access is a read-lock clone of the same `Arc`.
pub struct ModelStore {
    path: PathBuf,
    slot: RwLock<Option<Arc<ModelArtifact>>>,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            slot: RwLock::new(None),
        }
    }

    /// Artifact path from `MODEL_PATH`, defaulting to `model/model.msgpack`
    /// next to the executable so behavior does not depend on the working
    /// directory the process was launched from.
    pub fn from_env() -> Self {
        let path = std::env::var_os("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_artifact_path);
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether an artifact is currently cached. Never triggers a load; this
    /// backs the readiness probe.
    pub async fn is_loaded(&self) -> bool {
        self.slot.read().await.is_some()
    }

    /// Load and cache the artifact. Idempotent: once cached, further calls
    /// return the same instance without touching the filesystem.
    pub async fn load(&self) -> Result<Arc<ModelArtifact>, MlError> {
        let mut slot = self.slot.write().await;
        if let Some(artifact) = slot.as_ref() {
            return Ok(artifact.clone());
        }

        let bytes = tokio::fs::read(&self.path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                MlError::ArtifactNotFound {
                    path: self.path.clone(),
                }
            } else {
                MlError::Io(err)
            }
        })?;
        let artifact = ModelArtifact::from_msgpack_slice(&bytes)?;

        // The label table is a build-time constant; refuse artifacts whose
        // class space disagrees instead of failing at inference time.
        if artifact.classes != CLASS_NAMES {
            return Err(MlError::ClassMismatch {
                expected: CLASS_NAMES.iter().map(ToString::to_string).collect(),
                got: artifact.classes,
            });
        }

        let artifact = Arc::new(artifact);
        tracing::info!(path = %self.path.display(), "Model artifact loaded");
        *slot = Some(artifact.clone());
        Ok(artifact)
    }

    /// Cached artifact, loading it on first use.
    pub async fn get(&self) -> Result<Arc<ModelArtifact>, MlError> {
        if let Some(artifact) = self.slot.read().await.as_ref() {
            return Ok(artifact.clone());
        }
        self.load().await
    }
}

fn default_artifact_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("model")
        .join("model.msgpack")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gaussian_nb::GaussianNb;
    use ndarray::array;

    fn iris_shaped_artifact(classes: Vec<String>) -> ModelArtifact {
        let records = array![
            [5.0, 3.4, 1.5, 0.2],
            [5.1, 3.5, 1.4, 0.3],
            [6.0, 2.8, 4.5, 1.4],
            [6.1, 2.9, 4.6, 1.3],
            [7.0, 3.1, 6.0, 2.2],
            [7.1, 3.2, 6.1, 2.1],
        ];
        let targets = array![0, 0, 1, 1, 2, 2];
        let model = GaussianNb::fit(records.view(), targets.view()).unwrap();
        ModelArtifact::new(model, classes)
    }

    fn valid_classes() -> Vec<String> {
        CLASS_NAMES.iter().map(ToString::to_string).collect()
    }

    #[tokio::test]
    async fn missing_artifact_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.msgpack"));

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, MlError::ArtifactNotFound { .. }));
        assert!(!store.is_loaded().await);
    }

    #[tokio::test]
    async fn load_is_idempotent_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.msgpack");
        iris_shaped_artifact(valid_classes()).save(&path).unwrap();

        let store = ModelStore::new(&path);
        let first = store.load().await.unwrap();
        assert!(store.is_loaded().await);

        // Deleting the file must not matter: the second load has to come
        // out of the cache, not the filesystem.
        std::fs::remove_file(&path).unwrap();
        let second = store.load().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn get_lazily_loads_then_reuses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.msgpack");
        iris_shaped_artifact(valid_classes()).save(&path).unwrap();

        let store = ModelStore::new(&path);
        assert!(!store.is_loaded().await);

        let first = store.get().await.unwrap();
        assert!(store.is_loaded().await);
        let second = store.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn class_mismatch_is_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.msgpack");
        iris_shaped_artifact(vec!["a".into(), "b".into(), "c".into()])
            .save(&path)
            .unwrap();

        let store = ModelStore::new(&path);
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, MlError::ClassMismatch { .. }));
        assert!(!store.is_loaded().await);
    }

    #[tokio::test]
    async fn corrupt_artifact_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.msgpack");
        std::fs::write(&path, b"not msgpack").unwrap();

        let store = ModelStore::new(&path);
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, MlError::Decode(_)));
    }
}
