//! Price prediction over a loaded artifact
//!
//! [`Predictor`] is a cheap, cloneable handle over a shared
//! [`ModelArtifact`]. Every call is a read over immutable state, so one
//! predictor can serve any number of concurrent requests without locking.

use crate::artifact::ModelArtifact;
use crate::error::PredictionError;
use crate::features::FeatureVectorBuilder;
use crate::models::{FeatureImportance, FeatureVector, PredictionRequest, PredictionResult, FEATURE_NAMES};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Inference latency above which a warning is logged
const SLOW_INFERENCE_MS: u128 = 5;

#[derive(Debug, Clone)]
pub struct Predictor {
    artifact: Arc<ModelArtifact>,
}

impl Predictor {
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Run the regressor on a single feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, PredictionError> {
        let start = Instant::now();
        let price = self.artifact.regressor().predict(&features.to_array())?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > SLOW_INFERENCE_MS {
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", SLOW_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), price, "Inference completed");
        }
        Ok(price)
    }

    /// Encode a request, predict, and derive the lakh-scale price
    pub fn estimate(&self, request: &PredictionRequest) -> Result<PredictionResult, PredictionError> {
        let features = FeatureVectorBuilder::build(request, &self.artifact);
        let price = self.predict(&features)?;
        Ok(PredictionResult::from_price(price))
    }

    /// Feature importances paired with feature names in training order.
    ///
    /// Empty when the regressor does not expose importances.
    pub fn feature_importances(&self) -> Vec<FeatureImportance> {
        match self.artifact.regressor().feature_importances() {
            Some(scores) => FEATURE_NAMES
                .iter()
                .zip(scores)
                .map(|(name, score)| FeatureImportance {
                    feature: name.to_string(),
                    score: *score,
                })
                .collect(),
            None => Vec::new(),
        }
    }
}
