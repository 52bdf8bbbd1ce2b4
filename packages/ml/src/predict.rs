//! The prediction operation: validate, classify, resolve the class name.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::MlError;
use crate::store::ModelStore;
use crate::{CLASS_NAMES, FEATURE_COUNT};

/// Result of classifying one feature vector. Constructed per call, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub class_index: usize,
    /// One probability per class, summing to 1.
    pub probabilities: Vec<f64>,
    pub class_name: String,
}

/// Classify a single feature vector against the store's cached artifact,
/// loading it on first use.
///
/// The arity check runs before any model access: schema validation upstream
/// already rejects malformed requests, this guards the same constraint at
/// the core.
pub async fn predict(store: &ModelStore, features: &[f64]) -> Result<Prediction, MlError> {
    if features.len() != FEATURE_COUNT {
        return Err(MlError::InvalidInput {
            expected: FEATURE_COUNT,
            got: features.len(),
        });
    }

    let artifact = store.get().await?;

    let row = Array2::from_shape_vec((1, FEATURE_COUNT), features.to_vec())
        .map_err(|e| MlError::Inference(e.to_string()))?;
    let class_index = artifact
        .model
        .predict(row.view())?
        .first()
        .copied()
        .ok_or_else(|| MlError::Inference("empty prediction".to_string()))?;
    let probabilities = artifact
        .model
        .predict_proba(row.view())?
        .row(0)
        .to_vec();

    let class_name = CLASS_NAMES
        .get(class_index)
        .ok_or(MlError::ClassOutOfRange { index: class_index })?
        .to_string();

    Ok(Prediction {
        class_index,
        probabilities,
        class_name,
    })
}
