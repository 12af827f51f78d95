//! Offline artifact inspection

use anyhow::{Context, Result};
use colored::Colorize;
use pricing_lib::{models::ModelInfo, ArtifactLoader, Predictor};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::output::{print_success, OutputFormat};

#[derive(Serialize)]
struct InspectOutput {
    #[serde(flatten)]
    info: ModelInfo,
    brands: Vec<String>,
    fuels: Vec<String>,
    seller_types: Vec<String>,
    transmissions: Vec<String>,
}

pub(crate) fn print_model_info(info: &ModelInfo) {
    println!("{}", "Model".bold());
    println!("{}", "=".repeat(50));
    println!("Algorithm:              {}", info.algorithm.cyan());
    println!("Estimators:             {}", info.n_estimators);
    println!("Features:               {}", info.n_features);
    println!(
        "Importances:            {}",
        if info.has_importances { "available".green() } else { "unavailable".yellow() }
    );
    println!("Checksum:               {}", info.checksum);
    println!();
    println!("{}", "Encoder Classes".bold());
    println!("{}", "-".repeat(50));
    println!("Brands:                 {}", info.brand_classes);
    println!("Fuels:                  {}", info.fuel_classes);
    println!("Seller Types:           {}", info.seller_type_classes);
    println!("Transmissions:          {}", info.transmission_classes);
}

/// Load and validate an artifact from disk without a running server
pub fn inspect(path: &Path, format: OutputFormat) -> Result<()> {
    let artifact = ArtifactLoader::load(path)
        .with_context(|| format!("Failed to load artifact {}", path.display()))?;
    let predictor = Predictor::new(Arc::new(artifact));
    let artifact = predictor.artifact();
    let encoders = artifact.encoders();

    match format {
        OutputFormat::Json => {
            let output = InspectOutput {
                info: artifact.info(),
                brands: encoders.brand.classes().to_vec(),
                fuels: encoders.fuel.classes().to_vec(),
                seller_types: encoders.seller_type.classes().to_vec(),
                transmissions: encoders.transmission.classes().to_vec(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            print_success(&format!("Artifact {} is valid", path.display()));
            println!();
            print_model_info(&artifact.info());

            let importances = predictor.feature_importances();
            if !importances.is_empty() {
                println!();
                println!("{}", "Feature Importance".bold());
                println!("{}", "-".repeat(50));
                for item in &importances {
                    println!("{:<24}{:.4}", item.feature, item.score);
                }
            }
        }
    }

    Ok(())
}
