//! Model artifact loading and validation
//!
//! An artifact is a JSON document with exactly these entries:
//!
//! | key | content |
//! |---|---|
//! | `model` | regressor, tagged by `kind` |
//! | `le_name` | brand encoder |
//! | `le_fuel` | fuel-type encoder |
//! | `le_seller` | seller-type encoder |
//! | `le_transmission` | transmission encoder |
//!
//! Loading either yields a fully validated [`ModelArtifact`] or an
//! [`ArtifactError`]; a partially populated artifact is never returned.

use crate::encoder::CategoricalEncoder;
use crate::error::ArtifactError;
use crate::models::{ModelInfo, NUM_FEATURES};
use crate::regressor::{Regressor, RegressorSpec};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::{debug, info};

/// Artifact entry names
pub mod entries {
    pub const MODEL: &str = "model";
    pub const BRAND: &str = "le_name";
    pub const FUEL: &str = "le_fuel";
    pub const SELLER: &str = "le_seller";
    pub const TRANSMISSION: &str = "le_transmission";

    pub const ALL: [&str; 5] = [MODEL, BRAND, FUEL, SELLER, TRANSMISSION];
}

/// The four categorical encoders bound to a regressor
#[derive(Debug, Clone, PartialEq)]
pub struct Encoders {
    pub brand: CategoricalEncoder,
    pub fuel: CategoricalEncoder,
    pub seller_type: CategoricalEncoder,
    pub transmission: CategoricalEncoder,
}

impl Encoders {
    fn named(&self) -> [(&'static str, &CategoricalEncoder); 4] {
        [
            (entries::BRAND, &self.brand),
            (entries::FUEL, &self.fuel),
            (entries::SELLER, &self.seller_type),
            (entries::TRANSMISSION, &self.transmission),
        ]
    }
}

/// A regressor bundled with its encoders. Immutable once built.
#[derive(Debug)]
pub struct ModelArtifact {
    regressor: Box<dyn Regressor>,
    encoders: Encoders,
    checksum: String,
}

impl ModelArtifact {
    /// Bundle an in-memory regressor with its encoders
    pub fn new(regressor: Box<dyn Regressor>, encoders: Encoders) -> Result<Self, ArtifactError> {
        Self::assemble(regressor, encoders, "unpersisted".to_string())
    }

    fn assemble(
        regressor: Box<dyn Regressor>,
        encoders: Encoders,
        checksum: String,
    ) -> Result<Self, ArtifactError> {
        for (entry, encoder) in encoders.named() {
            if encoder.is_empty() {
                return Err(ArtifactError::corrupt(entry, "has an empty class list"));
            }
        }
        if let Some(scores) = regressor.feature_importances() {
            if scores.len() != NUM_FEATURES {
                return Err(ArtifactError::corrupt(
                    entries::MODEL,
                    format!("exposes {} importances, expected {}", scores.len(), NUM_FEATURES),
                ));
            }
        }
        Ok(Self {
            regressor,
            encoders,
            checksum,
        })
    }

    pub fn regressor(&self) -> &dyn Regressor {
        self.regressor.as_ref()
    }

    pub fn encoders(&self) -> &Encoders {
        &self.encoders
    }

    /// SHA-256 of the persisted artifact bytes
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            algorithm: self.regressor.algorithm().to_string(),
            n_estimators: self.regressor.n_estimators(),
            n_features: NUM_FEATURES,
            has_importances: self.regressor.feature_importances().is_some(),
            checksum: self.checksum.clone(),
            brand_classes: self.encoders.brand.len(),
            fuel_classes: self.encoders.fuel.len(),
            seller_type_classes: self.encoders.seller_type.len(),
            transmission_classes: self.encoders.transmission.len(),
        }
    }
}

/// Reads and validates model artifacts
pub struct ArtifactLoader;

impl ArtifactLoader {
    /// Load an artifact from a file
    pub fn load(path: impl AsRef<Path>) -> Result<ModelArtifact, ArtifactError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading model artifact");

        let bytes = std::fs::read(path)
            .map_err(|e| ArtifactError::not_found(path.display().to_string(), e))?;
        let artifact = Self::from_bytes(&bytes)?;

        info!(
            path = %path.display(),
            algorithm = artifact.regressor().algorithm(),
            n_estimators = artifact.regressor().n_estimators(),
            checksum = %artifact.checksum(),
            "Model artifact loaded"
        );
        Ok(artifact)
    }

    /// Parse an artifact from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<ModelArtifact, ArtifactError> {
        let mut document: Map<String, Value> = serde_json::from_slice(bytes)
            .map_err(|e| ArtifactError::corrupt("<root>", format!("is not a JSON object: {}", e)))?;

        for key in document.keys() {
            if !entries::ALL.contains(&key.as_str()) {
                debug!(entry = %key, "Ignoring unrecognised artifact entry");
            }
        }

        let spec: RegressorSpec = take_entry(&mut document, entries::MODEL)?;
        let encoders = Encoders {
            brand: take_entry(&mut document, entries::BRAND)?,
            fuel: take_entry(&mut document, entries::FUEL)?,
            seller_type: take_entry(&mut document, entries::SELLER)?,
            transmission: take_entry(&mut document, entries::TRANSMISSION)?,
        };

        ModelArtifact::assemble(spec.into_boxed(), encoders, compute_checksum(bytes))
    }
}

fn take_entry<T: DeserializeOwned>(
    document: &mut Map<String, Value>,
    entry: &str,
) -> Result<T, ArtifactError> {
    let value = document
        .remove(entry)
        .ok_or_else(|| ArtifactError::corrupt(entry, "is missing"))?;
    serde_json::from_value(value)
        .map_err(|e| ArtifactError::corrupt(entry, format!("is malformed: {}", e)))
}

/// Compute SHA256 checksum of artifact bytes
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
