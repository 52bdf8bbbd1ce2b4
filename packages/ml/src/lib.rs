//! Core of the Petal prediction service.
//!
//! This crate owns the classifier artifact, the lazy-loading [`ModelStore`]
//! and the [`predict`] operation. The HTTP layer in `petal-api` is a thin
//! shell around these two pieces.

pub mod artifact;
pub mod error;
pub mod gaussian_nb;
pub mod predict;
pub mod store;

pub use artifact::ModelArtifact;
pub use error::MlError;
pub use gaussian_nb::GaussianNb;
pub use predict::{Prediction, predict};
pub use store::ModelStore;

/// Number of input features per specimen.
pub const FEATURE_COUNT: usize = 4;

/// Names of the input features, in wire order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["sepal_length", "sepal_width", "petal_length", "petal_width"];

/// Class index → class name. Fixed at build time, never derived from the
/// artifact; [`ModelStore::load`] rejects artifacts that disagree.
pub const CLASS_NAMES: [&str; 3] = ["setosa", "versicolor", "virginica"];
