use std::path::PathBuf;

use thiserror::Error;

/// Failure modes of the model store and the prediction operation.
///
/// `ArtifactNotFound` and `InvalidInput` are recoverable by the caller
/// (train a model / fix the request); everything else is an internal fault.
#[derive(Debug, Error)]
pub enum MlError {
    #[error(
        "model artifact not found at {}; run `petal-train` to produce it",
        .path.display()
    )]
    ArtifactNotFound { path: PathBuf },

    #[error("expected exactly {expected} features, got {got}")]
    InvalidInput { expected: usize, got: usize },

    #[error("artifact reports classes {got:?}, service is built for {expected:?}")]
    ClassMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("predicted class index {index} is outside the label table")]
    ClassOutOfRange { index: usize },

    #[error("unsupported model artifact version {0}")]
    UnsupportedVersion(u8),

    #[error("invalid training data: {0}")]
    InvalidTrainingData(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode model artifact: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("failed to encode model artifact: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
}
