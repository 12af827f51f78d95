//! Core data models for the price predictor

use serde::{Deserialize, Serialize};

/// Number of features expected by every regressor
pub const NUM_FEATURES: usize = 11;

/// Feature names in training order. The regressor only sees positions, so
/// this order is part of the model contract.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "year",
    "km_driven",
    "name_encoded",
    "fuel_encoded",
    "seller_type_encoded",
    "transmission_encoded",
    "owner",
    "mileage",
    "engine",
    "max_power",
    "seats",
];

/// One lakh, the unit of the human-readable price scale
pub const LAKH: f64 = 100_000.0;

/// Raw vehicle attributes submitted for a price estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictionRequest {
    pub brand: String,
    pub year: i64,
    pub km_driven: i64,
    pub fuel: String,
    pub seller_type: String,
    pub transmission: String,
    pub owner: i64,
    /// km/l
    pub mileage: f64,
    /// cc
    pub engine: f64,
    /// bhp
    pub max_power: f64,
    pub seats: i64,
}

/// Numeric model input in training order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub year: f64,
    pub km_driven: f64,
    pub name_encoded: f64,
    pub fuel_encoded: f64,
    pub seller_type_encoded: f64,
    pub transmission_encoded: f64,
    pub owner: f64,
    pub mileage: f64,
    pub engine: f64,
    pub max_power: f64,
    pub seats: f64,
}

impl FeatureVector {
    /// Positional form consumed by regressors, ordered as [`FEATURE_NAMES`]
    pub fn to_array(&self) -> [f64; NUM_FEATURES] {
        [
            self.year,
            self.km_driven,
            self.name_encoded,
            self.fuel_encoded,
            self.seller_type_encoded,
            self.transmission_encoded,
            self.owner,
            self.mileage,
            self.engine,
            self.max_power,
            self.seats,
        ]
    }

    /// Named view, ordered as [`FEATURE_NAMES`]
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        FEATURE_NAMES.iter().copied().zip(self.to_array()).collect()
    }
}

/// Price estimate returned to callers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_price: f64,
    pub price_in_lakhs: f64,
}

impl PredictionResult {
    pub fn from_price(predicted_price: f64) -> Self {
        Self {
            predicted_price,
            price_in_lakhs: predicted_price / LAKH,
        }
    }
}

/// Importance score of a single feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub score: f64,
}

/// Summary of a loaded artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub algorithm: String,
    pub n_estimators: usize,
    pub n_features: usize,
    pub has_importances: bool,
    pub checksum: String,
    pub brand_classes: usize,
    pub fuel_classes: usize,
    pub seller_type_classes: usize,
    pub transmission_classes: usize,
}
