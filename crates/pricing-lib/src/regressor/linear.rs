//! Linear regression: `intercept + coefficients · features`

use super::{check_input, check_output, Regressor};
use crate::error::RegressorError;
use crate::models::NUM_FEATURES;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLinear")]
pub struct LinearRegressor {
    intercept: f64,
    coefficients: Vec<f64>,
}

#[derive(Deserialize)]
struct RawLinear {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl TryFrom<RawLinear> for LinearRegressor {
    type Error = String;

    fn try_from(raw: RawLinear) -> Result<Self, Self::Error> {
        Self::new(raw.intercept, raw.coefficients)
    }
}

impl LinearRegressor {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Result<Self, String> {
        if coefficients.len() != NUM_FEATURES {
            return Err(format!(
                "expected {} coefficients, got {}",
                NUM_FEATURES,
                coefficients.len()
            ));
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err("linear model has non-finite parameters".to_string());
        }
        Ok(Self {
            intercept,
            coefficients,
        })
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, RegressorError> {
        check_input(features)?;
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        check_output(self.intercept + dot)
    }

    fn algorithm(&self) -> &'static str {
        "linear_regression"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_weighted_sum() {
        let mut coefficients = vec![0.0; NUM_FEATURES];
        coefficients[0] = 1000.0;
        coefficients[1] = -2.0;
        let model = LinearRegressor::new(-1_500_000.0, coefficients).unwrap();

        let mut features = [0.0; NUM_FEATURES];
        features[0] = 2020.0;
        features[1] = 10_000.0;
        assert_eq!(model.predict(&features).unwrap(), 500_000.0);
    }

    #[test]
    fn test_exposes_no_importances() {
        let model = LinearRegressor::new(0.0, vec![1.0; NUM_FEATURES]).unwrap();
        assert!(model.feature_importances().is_none());
        assert_eq!(model.n_estimators(), 1);
    }

    #[test]
    fn test_rejects_wrong_coefficient_count() {
        assert!(LinearRegressor::new(0.0, vec![1.0; 3]).is_err());
    }

    #[test]
    fn test_overflow_is_a_failure() {
        let model = LinearRegressor::new(0.0, vec![f64::MAX; NUM_FEATURES]).unwrap();
        let features = [f64::MAX; NUM_FEATURES];
        assert!(matches!(
            model.predict(&features),
            Err(RegressorError::NonFiniteOutput(_))
        ));
    }
}
