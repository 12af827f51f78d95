//! Price estimation command

use anyhow::Result;
use colored::Colorize;
use pricing_lib::models::PredictionRequest;
use serde::Serialize;
use tabled::Tabled;

use crate::client::{ApiClient, PredictionResponse};
use crate::output::{format_km, format_lakhs, format_price, print_table, print_warning, OutputFormat};

/// Row for the car summary table
#[derive(Tabled, Serialize)]
struct SummaryRow {
    #[tabled(rename = "Attribute")]
    attribute: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn summary_rows(request: &PredictionRequest) -> Vec<SummaryRow> {
    let row = |attribute, value: String| SummaryRow { attribute, value };
    vec![
        row("Brand", request.brand.clone()),
        row("Year", request.year.to_string()),
        row("Kilometers Driven", format_km(request.km_driven)),
        row("Fuel", request.fuel.clone()),
        row("Seller Type", request.seller_type.clone()),
        row("Transmission", request.transmission.clone()),
        row("Previous Owners", request.owner.to_string()),
        row("Mileage", format!("{:.1} km/l", request.mileage)),
        row("Engine", format!("{:.0} CC", request.engine)),
        row("Max Power", format!("{:.1} bhp", request.max_power)),
        row("Seats", request.seats.to_string()),
    ]
}

#[derive(Serialize)]
struct PredictionOutput<'a> {
    car: &'a PredictionRequest,
    #[serde(flatten)]
    estimate: &'a PredictionResponse,
}

/// Estimate the price of a car through the price server
pub async fn predict(client: &ApiClient, request: PredictionRequest, format: OutputFormat) -> Result<()> {
    let result = client.predict(&request).await?;

    match format {
        OutputFormat::Json => {
            let output = PredictionOutput {
                car: &request,
                estimate: &result,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            println!("{}", "Estimated Price".bold());
            println!("{}", "=".repeat(50));
            println!("Price:                  {}", format_price(result.predicted_price).green().bold());
            println!("In Lakhs:               {}", format_lakhs(result.price_in_lakhs).green());
            println!();

            println!("{}", "Car Summary".bold());
            println!("{}", "-".repeat(50));
            print_table(&summary_rows(&request), format);

            if !result.unknown_categories.is_empty() {
                println!();
                print_warning(&format!(
                    "Not seen during training, estimate may be less reliable: {}",
                    result.unknown_categories.join(", ")
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_rows_cover_every_field() {
        let request = PredictionRequest {
            brand: "Honda".to_string(),
            year: 2018,
            km_driven: 65_000,
            fuel: "Petrol".to_string(),
            seller_type: "Individual".to_string(),
            transmission: "Automatic".to_string(),
            owner: 2,
            mileage: 17.4,
            engine: 1497.0,
            max_power: 117.6,
            seats: 5,
        };

        let rows = summary_rows(&request);
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[2].value, "65,000 km");
        assert_eq!(rows[8].value, "1497 CC");
        assert_eq!(rows[9].value, "117.6 bhp");
    }
}
