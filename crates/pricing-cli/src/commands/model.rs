//! Commands that describe the served model

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{importance_bar, print_info, OutputFormat};

/// Row for feature importance table
#[derive(Tabled)]
struct ImportanceRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "")]
    bar: String,
}

/// Show the selection choices accepted for each categorical field
pub async fn show_classes(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let classes = client.classes().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&classes)?);
        }
        OutputFormat::Table => {
            println!("{}", "Known Categories".bold());
            println!("{}", "=".repeat(50));
            println!("Brands:                 {}", classes.brands.join(", ").cyan());
            println!("Fuels:                  {}", classes.fuels.join(", ").cyan());
            println!("Seller Types:           {}", classes.seller_types.join(", ").cyan());
            println!("Transmissions:          {}", classes.transmissions.join(", ").cyan());
            if let (Some(newest), Some(oldest)) = (classes.years.first(), classes.years.last()) {
                println!("Years:                  {} to {}", oldest, newest);
            }
        }
    }

    Ok(())
}

/// Show feature importances in feature order
pub async fn show_importances(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let response = client.importances().await?;

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if !response.available {
        print_info("Feature importance not available for this model.");
        return Ok(());
    }

    let max = response
        .importances
        .iter()
        .map(|i| i.score)
        .fold(0.0_f64, f64::max);

    let rows: Vec<ImportanceRow> = response
        .importances
        .iter()
        .map(|i| ImportanceRow {
            feature: i.feature.clone(),
            score: format!("{:.4}", i.score),
            bar: importance_bar(i.score, max),
        })
        .collect();

    println!("{}", "Feature Importance".bold());
    println!("{}", "=".repeat(50));
    println!("{}", tabled::Table::new(rows).with(tabled::settings::Style::rounded()));

    Ok(())
}

/// Show metadata for the model the server has loaded
pub async fn show_model(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let info = client.model_info().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Table => super::inspect::print_model_info(&info),
    }

    Ok(())
}
