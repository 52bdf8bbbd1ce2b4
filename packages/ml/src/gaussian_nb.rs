//! Gaussian naive Bayes classifier.
//!
//! Implemented in-crate because the serving contract needs a full per-class
//! probability distribution, which the off-the-shelf Bayes fits don't expose.
//! Parameterization follows the usual one: per-class priors, feature means
//! and smoothed variances, with the smoothing term tied to the largest
//! feature variance in the training data.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::MlError;

/// Relative variance smoothing, scaled by the largest feature variance.
const VAR_SMOOTHING: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaussianNb {
    /// Class priors, one per class, summing to 1.
    priors: Array1<f64>,
    /// Per-class feature means (n_classes × n_features).
    means: Array2<f64>,
    /// Per-class smoothed feature variances (n_classes × n_features).
    variances: Array2<f64>,
}

impl GaussianNb {
    /// Fit the classifier on `records` (rows = samples) with integer class
    /// targets. Class indices must be dense: every class in
    /// `0..=targets.max()` needs at least one sample.
    pub fn fit(records: ArrayView2<f64>, targets: ArrayView1<usize>) -> Result<Self, MlError> {
        let n_samples = records.nrows();
        let n_features = records.ncols();
        if n_samples == 0 || n_features == 0 {
            return Err(MlError::InvalidTrainingData(
                "training set is empty".to_string(),
            ));
        }
        if targets.len() != n_samples {
            return Err(MlError::InvalidTrainingData(format!(
                "{} samples but {} targets",
                n_samples,
                targets.len()
            )));
        }

        let n_classes = targets.iter().max().map_or(0, |m| m + 1);
        let mut counts = vec![0usize; n_classes];
        for &t in targets {
            counts[t] += 1;
        }
        if let Some(empty) = counts.iter().position(|&c| c == 0) {
            return Err(MlError::InvalidTrainingData(format!(
                "class {empty} has no samples"
            )));
        }

        let mut means = Array2::<f64>::zeros((n_classes, n_features));
        for (row, &t) in records.rows().into_iter().zip(targets) {
            for (j, &x) in row.iter().enumerate() {
                means[[t, j]] += x;
            }
        }
        for (c, &count) in counts.iter().enumerate() {
            for j in 0..n_features {
                means[[c, j]] /= count as f64;
            }
        }

        let mut variances = Array2::<f64>::zeros((n_classes, n_features));
        for (row, &t) in records.rows().into_iter().zip(targets) {
            for (j, &x) in row.iter().enumerate() {
                let d = x - means[[t, j]];
                variances[[t, j]] += d * d;
            }
        }
        for (c, &count) in counts.iter().enumerate() {
            for j in 0..n_features {
                variances[[c, j]] /= count as f64;
            }
        }

        // Smooth with a fraction of the widest overall feature variance so
        // constant features don't collapse the likelihood.
        let mut max_feature_var = 0.0f64;
        for j in 0..n_features {
            let col = records.column(j);
            let mean = col.sum() / n_samples as f64;
            let var = col.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n_samples as f64;
            max_feature_var = max_feature_var.max(var);
        }
        let eps = (VAR_SMOOTHING * max_feature_var).max(f64::MIN_POSITIVE);
        variances.mapv_inplace(|v| v + eps);

        let priors = Array1::from_iter(counts.iter().map(|&c| c as f64 / n_samples as f64));

        Ok(Self {
            priors,
            means,
            variances,
        })
    }

    pub fn n_classes(&self) -> usize {
        self.priors.len()
    }

    pub fn n_features(&self) -> usize {
        self.means.ncols()
    }

    /// Predicted class index per input row.
    pub fn predict(&self, records: ArrayView2<f64>) -> Result<Vec<usize>, MlError> {
        self.check_width(records)?;
        Ok(records
            .rows()
            .into_iter()
            .map(|row| {
                let jll = self.joint_log_likelihood(row);
                argmax(&jll)
            })
            .collect())
    }

    /// Per-class probability distribution per input row. Each row of the
    /// result has `n_classes` entries summing to 1.
    pub fn predict_proba(&self, records: ArrayView2<f64>) -> Result<Array2<f64>, MlError> {
        self.check_width(records)?;
        let mut out = Array2::<f64>::zeros((records.nrows(), self.n_classes()));
        for (i, row) in records.rows().into_iter().enumerate() {
            let jll = self.joint_log_likelihood(row);
            // Log-sum-exp normalization keeps tiny likelihoods from
            // underflowing to a 0/0 division.
            let max = jll.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let mut total = 0.0;
            for (c, &ll) in jll.iter().enumerate() {
                let p = (ll - max).exp();
                out[[i, c]] = p;
                total += p;
            }
            for c in 0..self.n_classes() {
                out[[i, c]] /= total;
            }
        }
        Ok(out)
    }

    fn check_width(&self, records: ArrayView2<f64>) -> Result<(), MlError> {
        if records.ncols() != self.n_features() {
            return Err(MlError::InvalidInput {
                expected: self.n_features(),
                got: records.ncols(),
            });
        }
        Ok(())
    }

    fn joint_log_likelihood(&self, row: ArrayView1<f64>) -> Array1<f64> {
        let mut jll = Array1::<f64>::zeros(self.n_classes());
        for c in 0..self.n_classes() {
            let mut ll = self.priors[c].ln();
            for (j, &x) in row.iter().enumerate() {
                let mean = self.means[[c, j]];
                let var = self.variances[[c, j]];
                ll += -0.5 * (2.0 * std::f64::consts::PI * var).ln()
                    - (x - mean).powi(2) / (2.0 * var);
            }
            jll[c] = ll;
        }
        jll
    }
}

fn argmax(values: &Array1<f64>) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}
