//! Observability infrastructure for the price predictor
//!
//! Provides:
//! - Prometheus metrics (prediction latency, request/error counters, model info)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge, register_gauge_vec, register_histogram, register_int_counter,
    register_int_counter_vec, Gauge, GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PricingMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct PricingMetricsInner {
    prediction_latency_seconds: Histogram,
    artifact_load_seconds: Gauge,
    model_info: GaugeVec,
    predictions_total: IntCounter,
    prediction_errors_total: IntCounter,
    validation_errors_total: IntCounter,
    unknown_categories_total: IntCounterVec,
}

impl PricingMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "car_price_prediction_latency_seconds",
                "Time spent encoding a request and running the regressor",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            artifact_load_seconds: register_gauge!(
                "car_price_artifact_load_seconds",
                "Time spent loading the model artifact at startup"
            )
            .expect("Failed to register artifact_load_seconds"),

            model_info: register_gauge_vec!(
                "car_price_model_info",
                "Information about the currently loaded model artifact",
                &["algorithm", "checksum"]
            )
            .expect("Failed to register model_info"),

            predictions_total: register_int_counter!(
                "car_price_predictions_total",
                "Total number of successful price predictions"
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter!(
                "car_price_prediction_errors_total",
                "Total number of failed price predictions"
            )
            .expect("Failed to register prediction_errors_total"),

            validation_errors_total: register_int_counter!(
                "car_price_validation_errors_total",
                "Total number of requests rejected by input validation"
            )
            .expect("Failed to register validation_errors_total"),

            unknown_categories_total: register_int_counter_vec!(
                "car_price_unknown_categories_total",
                "Categorical values not seen at training time, by field",
                &["field"]
            )
            .expect("Failed to register unknown_categories_total"),
        }
    }
}

/// Metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct PricingMetrics {
    _private: (),
}

impl Default for PricingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PricingMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PricingMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn set_artifact_load_time(&self, duration_secs: f64) {
        self.inner().artifact_load_seconds.set(duration_secs);
    }

    /// Update model info, keeping only the first 12 checksum characters
    pub fn set_model_info(&self, algorithm: &str, checksum: &str) {
        let short = &checksum[..checksum.len().min(12)];
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[algorithm, short])
            .set(1.0);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors_total.inc();
    }

    pub fn inc_validation_errors(&self) {
        self.inner().validation_errors_total.inc();
    }

    pub fn inc_unknown_category(&self, field: &str) {
        self.inner()
            .unknown_categories_total
            .with_label_values(&[field])
            .inc();
    }

    pub fn predictions_total(&self) -> u64 {
        self.inner().predictions_total.get()
    }

    pub fn prediction_errors_total(&self) -> u64 {
        self.inner().prediction_errors_total.get()
    }
}

/// Structured logger for service events
///
/// Provides consistent JSON-formatted logging for predictions,
/// artifact lifecycle, and other significant events.
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Log a successful artifact load
    pub fn log_artifact_loaded(&self, path: &str, algorithm: &str, checksum: &str, load_ms: u128) {
        info!(
            event = "artifact_loaded",
            service = %self.service,
            path = %path,
            algorithm = %algorithm,
            checksum = %checksum,
            load_ms = load_ms,
            "Model artifact ready"
        );
    }

    /// Log a fatal artifact failure
    pub fn log_artifact_failed(&self, path: &str, kind: &str, details: &str) {
        error!(
            event = "artifact_failed",
            service = %self.service,
            path = %path,
            kind = %kind,
            details = %details,
            "Model artifact could not be loaded"
        );
    }

    /// Log a price prediction
    pub fn log_prediction(&self, brand: &str, year: i64, predicted_price: f64, price_in_lakhs: f64) {
        info!(
            event = "prediction_generated",
            service = %self.service,
            brand = %brand,
            year = year,
            predicted_price = predicted_price,
            price_in_lakhs = price_in_lakhs,
            "Generated price prediction"
        );
    }

    /// Log a per-request prediction failure
    pub fn log_prediction_failed(&self, brand: &str, details: &str) {
        warn!(
            event = "prediction_failed",
            service = %self.service,
            brand = %brand,
            details = %details,
            "Price prediction failed"
        );
    }

    /// Log a categorical value outside the training vocabulary
    pub fn log_unknown_category(&self, field: &str, value: &str) {
        info!(
            event = "unknown_category",
            service = %self.service,
            field = %field,
            value = %value,
            "Unseen category encoded as sentinel"
        );
    }

    pub fn log_startup(&self, version: &str, algorithm: &str) {
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            algorithm = %algorithm,
            "Price service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Price service shutting down"
        );
    }
}
