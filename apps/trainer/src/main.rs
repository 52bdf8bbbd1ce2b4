//! Offline training step: fits the Iris classifier and writes the model
//! artifact the serving process loads. Run this before `petal-server`.

use std::path::PathBuf;

use ndarray::{Array1, Array2};
use petal_ml::{CLASS_NAMES, GaussianNb, ModelArtifact};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Loading Iris dataset");
    let dataset = linfa_datasets::iris();
    let records = dataset.records;
    let targets = dataset.targets;
    let n_features = records.ncols();

    // Deterministic holdout: every fifth sample. The dataset is ordered by
    // class, so this keeps all three classes in both splits.
    let mut train_x = Vec::new();
    let mut train_y = Vec::new();
    let mut test_x = Vec::new();
    let mut test_y = Vec::new();
    for (i, (row, &target)) in records.rows().into_iter().zip(targets.iter()).enumerate() {
        if i % 5 == 0 {
            test_x.extend(row.iter().copied());
            test_y.push(target);
        } else {
            train_x.extend(row.iter().copied());
            train_y.push(target);
        }
    }
    let train_records = Array2::from_shape_vec((train_y.len(), n_features), train_x)?;
    let train_targets = Array1::from(train_y);
    let test_records = Array2::from_shape_vec((test_y.len(), n_features), test_x)?;

    tracing::info!(
        train = train_targets.len(),
        test = test_y.len(),
        "Fitting Gaussian naive Bayes classifier"
    );
    let model = GaussianNb::fit(train_records.view(), train_targets.view())?;

    let predictions = model.predict(test_records.view())?;
    let correct = predictions
        .iter()
        .zip(test_y.iter())
        .filter(|(p, t)| p == t)
        .count();
    let accuracy = correct as f64 / test_y.len() as f64;
    tracing::info!("Holdout accuracy: {:.4}", accuracy);

    let path = std::env::var_os("MODEL_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("model/model.msgpack"));
    let artifact = ModelArtifact::new(
        model,
        CLASS_NAMES.iter().map(ToString::to_string).collect(),
    );
    artifact.save(&path)?;
    tracing::info!(path = %path.display(), "Model artifact saved");

    Ok(())
}
