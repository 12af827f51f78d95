//! Feature vector assembly
//!
//! Turns a [`PredictionRequest`] into the positional input the regressor was
//! trained on. Categorical fields go through the artifact's encoders; numeric
//! fields are copied verbatim, without clamping or range checks.

use crate::artifact::{Encoders, ModelArtifact};
use crate::encoder::UNKNOWN_CATEGORY;
use crate::models::{FeatureVector, PredictionRequest};

/// Categorical request fields, in feature order
const CATEGORICAL_FIELDS: [&str; 4] = ["brand", "fuel", "seller_type", "transmission"];

/// Builds feature vectors against an artifact's encoders
pub struct FeatureVectorBuilder;

impl FeatureVectorBuilder {
    pub fn build(request: &PredictionRequest, artifact: &ModelArtifact) -> FeatureVector {
        Self::build_with(request, artifact.encoders())
    }

    pub fn build_with(request: &PredictionRequest, encoders: &Encoders) -> FeatureVector {
        let codes = encode_categoricals(request, encoders);

        FeatureVector {
            year: request.year as f64,
            km_driven: request.km_driven as f64,
            name_encoded: codes[0] as f64,
            fuel_encoded: codes[1] as f64,
            seller_type_encoded: codes[2] as f64,
            transmission_encoded: codes[3] as f64,
            owner: request.owner as f64,
            mileage: request.mileage,
            engine: request.engine,
            max_power: request.max_power,
            seats: request.seats as f64,
        }
    }

    /// Names of the categorical fields whose value was not seen at training
    /// time, in feature order
    pub fn unseen_categories(request: &PredictionRequest, encoders: &Encoders) -> Vec<&'static str> {
        encode_categoricals(request, encoders)
            .iter()
            .zip(CATEGORICAL_FIELDS)
            .filter(|(code, _)| **code == UNKNOWN_CATEGORY)
            .map(|(_, field)| field)
            .collect()
    }
}

fn encode_categoricals(request: &PredictionRequest, encoders: &Encoders) -> [i64; 4] {
    [
        encoders.brand.encode(&request.brand),
        encoders.fuel.encode(&request.fuel),
        encoders.seller_type.encode(&request.seller_type),
        encoders.transmission.encode(&request.transmission),
    ]
}
