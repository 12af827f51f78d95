//! Input bounds for the request-collection boundary
//!
//! These limits mirror the choices offered by the input form (year picker,
//! kilometre and engine ranges, seat options). The feature builder never
//! applies them; callers that accept free-form input opt in at the edge.

use crate::error::{FieldViolation, ValidationError};
use crate::models::PredictionRequest;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Earliest purchase year offered
pub const MIN_YEAR: i64 = 2005;

/// Configurable bounds for boundary validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputPolicy {
    pub min_year: i64,
    pub max_year: i64,
    pub km_driven: RangeInclusive<i64>,
    pub owner: RangeInclusive<i64>,
    pub mileage: RangeInclusive<f64>,
    pub engine: RangeInclusive<f64>,
    pub max_power: RangeInclusive<f64>,
    pub seats: Vec<i64>,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            min_year: MIN_YEAR,
            max_year: current_year(),
            km_driven: 0..=500_000,
            owner: 0..=4,
            mileage: 5.0..=40.0,
            engine: 500.0..=5000.0,
            max_power: 30.0..=500.0,
            seats: vec![4, 5, 7, 8],
        }
    }
}

impl InputPolicy {
    /// Year choices, newest first
    pub fn year_choices(&self) -> Vec<i64> {
        (self.min_year..=self.max_year).rev().collect()
    }

    /// Check every field and report all violations at once
    pub fn validate(&self, request: &PredictionRequest) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if !(self.min_year..=self.max_year).contains(&request.year) {
            violations.push(violation(
                "year",
                format!("must be within {}..={}", self.min_year, self.max_year),
            ));
        }
        check_range(&mut violations, "km_driven", &self.km_driven, request.km_driven);
        check_range(&mut violations, "owner", &self.owner, request.owner);
        check_range(&mut violations, "mileage", &self.mileage, request.mileage);
        check_range(&mut violations, "engine", &self.engine, request.engine);
        check_range(&mut violations, "max_power", &self.max_power, request.max_power);
        if !self.seats.contains(&request.seats) {
            let options: Vec<String> = self.seats.iter().map(|s| s.to_string()).collect();
            violations.push(violation("seats", format!("must be one of {}", options.join(", "))));
        }
        for (field, value) in [
            ("brand", &request.brand),
            ("fuel", &request.fuel),
            ("seller_type", &request.seller_type),
            ("transmission", &request.transmission),
        ] {
            if value.trim().is_empty() {
                violations.push(violation(field, "must not be empty".to_string()));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}

fn check_range<T>(violations: &mut Vec<FieldViolation>, field: &'static str, range: &RangeInclusive<T>, value: T)
where
    T: PartialOrd + std::fmt::Display,
{
    if !range.contains(&value) {
        violations.push(violation(
            field,
            format!("must be within {}..={}", range.start(), range.end()),
        ));
    }
}

fn violation(field: &'static str, message: String) -> FieldViolation {
    FieldViolation { field, message }
}

pub fn current_year() -> i64 {
    chrono::Utc::now().year() as i64
}
