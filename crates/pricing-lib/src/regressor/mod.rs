//! Regression models consumed by the predictor
//!
//! A regressor is an opaque capability mapping an 11-feature vector to a
//! price. Two persisted kinds are supported: a random-forest ensemble that
//! carries per-feature importances, and a plain linear model that does not.

mod forest;
mod linear;

pub use forest::{Node, RandomForestRegressor, Tree};
pub use linear::LinearRegressor;

use crate::error::RegressorError;
use crate::models::NUM_FEATURES;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for regression implementations
pub trait Regressor: Send + Sync + Debug {
    /// Predict a single value from a feature vector in training order
    fn predict(&self, features: &[f64]) -> Result<f64, RegressorError>;

    /// Per-feature importance scores aligned to the feature order, if the
    /// model exposes them
    fn feature_importances(&self) -> Option<&[f64]> {
        None
    }

    /// Algorithm name used in model info and metrics
    fn algorithm(&self) -> &'static str;

    /// Number of fitted estimators
    fn n_estimators(&self) -> usize {
        1
    }
}

/// Persisted regressor, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorSpec {
    RandomForest(RandomForestRegressor),
    Linear(LinearRegressor),
}

impl RegressorSpec {
    pub fn into_boxed(self) -> Box<dyn Regressor> {
        match self {
            RegressorSpec::RandomForest(forest) => Box::new(forest),
            RegressorSpec::Linear(linear) => Box::new(linear),
        }
    }
}

/// Shared input checks run before every prediction
pub(crate) fn check_input(features: &[f64]) -> Result<(), RegressorError> {
    if features.len() != NUM_FEATURES {
        return Err(RegressorError::DimensionMismatch {
            expected: NUM_FEATURES,
            actual: features.len(),
        });
    }
    if let Some((index, value)) = features.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(RegressorError::NonFiniteInput {
            index,
            value: *value,
        });
    }
    Ok(())
}

pub(crate) fn check_output(value: f64) -> Result<f64, RegressorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RegressorError::NonFiniteOutput(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regressor_tagged_by_kind() {
        let json = r#"{
            "kind": "linear",
            "intercept": 100000.0,
            "coefficients": [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        }"#;
        let spec: RegressorSpec = serde_json::from_str(json).unwrap();
        let regressor = spec.into_boxed();
        assert_eq!(regressor.algorithm(), "linear_regression");
        assert_eq!(regressor.predict(&[1.0; NUM_FEATURES]).unwrap(), 100_000.0);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"kind": "neural_net", "layers": []}"#;
        assert!(serde_json::from_str::<RegressorSpec>(json).is_err());
    }

    #[test]
    fn test_check_input_dimension() {
        let err = check_input(&[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            RegressorError::DimensionMismatch {
                expected: NUM_FEATURES,
                actual: 2
            }
        );
    }

    #[test]
    fn test_check_input_non_finite() {
        let mut features = [0.0; NUM_FEATURES];
        features[7] = f64::NAN;
        assert!(matches!(
            check_input(&features),
            Err(RegressorError::NonFiniteInput { index: 7, .. })
        ));
    }

    #[test]
    fn test_check_output() {
        assert_eq!(check_output(1.5).unwrap(), 1.5);
        assert!(check_output(f64::INFINITY).is_err());
    }
}
