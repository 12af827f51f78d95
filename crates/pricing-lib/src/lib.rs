//! Pricing library for the used-car price predictor
//!
//! This crate provides the core functionality for:
//! - Categorical encoding with an unseen-category sentinel
//! - Model artifact loading, validation and load-once caching
//! - Fixed-order feature vector assembly
//! - Price prediction and feature importances
//! - Health checks and observability

pub mod artifact;
pub mod cache;
pub mod encoder;
pub mod error;
pub mod features;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod regressor;
pub mod validation;

pub use artifact::{ArtifactLoader, Encoders, ModelArtifact};
pub use cache::{process_artifact, ArtifactCache};
pub use encoder::{CategoricalEncoder, UNKNOWN_CATEGORY};
pub use error::{ArtifactError, PredictionError, RegressorError, ValidationError};
pub use features::FeatureVectorBuilder;
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{PricingMetrics, StructuredLogger};
pub use predictor::Predictor;
pub use regressor::{Regressor, RegressorSpec};
pub use validation::InputPolicy;
