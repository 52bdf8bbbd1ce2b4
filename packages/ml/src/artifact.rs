//! Serialized form of a trained classifier.
//!
//! The on-disk format is a MessagePack document with a leading version field
//! so the layout can evolve without breaking old artifacts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MlError;
use crate::gaussian_nb::GaussianNb;

pub const ARTIFACT_VERSION: u8 = 1;

/// A trained classifier plus the class-name metadata it was fitted with.
/// Immutable once loaded; the store hands it out behind an `Arc`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: u8,
    pub model: GaussianNb,
    /// Class index → class name, in training order.
    pub classes: Vec<String>,
}

impl ModelArtifact {
    pub fn new(model: GaussianNb, classes: Vec<String>) -> Self {
        Self {
            version: ARTIFACT_VERSION,
            model,
            classes,
        }
    }

    pub fn to_msgpack_vec(&self) -> Result<Vec<u8>, MlError> {
        Ok(rmp_serde::to_vec(self)?)
    }

    pub fn from_msgpack_slice(bytes: &[u8]) -> Result<Self, MlError> {
        let artifact: ModelArtifact = rmp_serde::from_slice(bytes)?;
        if artifact.version != ARTIFACT_VERSION {
            return Err(MlError::UnsupportedVersion(artifact.version));
        }
        Ok(artifact)
    }

    /// Write the artifact to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), MlError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_msgpack_vec()?)?;
        Ok(())
    }
}
