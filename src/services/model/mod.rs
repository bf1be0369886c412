//! Regression model used by the prediction engine.
//!
//! A [`StandardScaler`] feeding a [`RandomForestRegressor`], fit together as
//! one [`ScaledForest`].

pub mod forest;
pub mod scaler;
pub mod tree;

pub use forest::{ForestConfig, RandomForestRegressor};
pub use scaler::StandardScaler;
pub use tree::{RegressionTree, TreeConfig};

use thiserror::Error;

/// Failures while fitting or evaluating the model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Found array with 0 sample(s)")]
    EmptyInput,

    #[error("X has {got} features, but the model expects {expected}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("Found {samples} samples but {targets} targets")]
    TargetMismatch { samples: usize, targets: usize },

    #[error("Input contains NaN or infinity")]
    NonFinite,

    #[error("Model is not fitted yet")]
    NotFitted,
}

/// Check a design matrix: non-empty, rectangular and finite.
/// Returns the feature count.
pub(crate) fn validate_matrix(x: &[Vec<f64>]) -> Result<usize, ModelError> {
    let n_features = x.first().map(Vec::len).ok_or(ModelError::EmptyInput)?;
    if n_features == 0 {
        return Err(ModelError::EmptyInput);
    }

    for row in x {
        if row.len() != n_features {
            return Err(ModelError::FeatureMismatch {
                expected: n_features,
                got: row.len(),
            });
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite);
        }
    }

    Ok(n_features)
}

/// Standardization followed by a random forest, fit on the same data.
#[derive(Debug, Clone)]
pub struct ScaledForest {
    scaler: Option<StandardScaler>,
    forest: RandomForestRegressor,
}

impl ScaledForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            scaler: None,
            forest: RandomForestRegressor::new(config),
        }
    }

    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ModelError> {
        let scaler = StandardScaler::fit(x)?;
        let scaled = scaler.transform(x)?;
        self.forest.fit(&scaled, y)?;
        self.scaler = Some(scaler);
        Ok(())
    }

    pub fn predict_one(&self, x: &[f64]) -> Result<f64, ModelError> {
        let scaler = self.scaler.as_ref().ok_or(ModelError::NotFitted)?;
        self.forest.predict_one(&scaler.transform_one(x)?)
    }
}
