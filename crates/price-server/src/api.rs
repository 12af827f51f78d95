//! HTTP API for price predictions, health checks and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pricing_lib::{
    health::{components, ComponentStatus, HealthRegistry},
    models::{FeatureImportance, ModelInfo, PredictionRequest},
    observability::{PricingMetrics, StructuredLogger},
    validation::InputPolicy,
    FeatureVectorBuilder, Predictor, ValidationError,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Predictor,
    pub health_registry: HealthRegistry,
    pub metrics: PricingMetrics,
    pub logger: StructuredLogger,
    /// Boundary bounds; `None` accepts any well-typed request
    pub input_policy: Option<InputPolicy>,
}

impl AppState {
    pub fn new(
        predictor: Predictor,
        health_registry: HealthRegistry,
        metrics: PricingMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            predictor,
            health_registry,
            metrics,
            logger,
            input_policy: None,
        }
    }

    pub fn with_input_policy(mut self, policy: InputPolicy) -> Self {
        self.input_policy = Some(policy);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_price: f64,
    pub price_in_lakhs: f64,
    /// Categorical fields that were encoded as unseen
    pub unknown_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassesResponse {
    pub brands: Vec<String>,
    pub fuels: Vec<String>,
    pub seller_types: Vec<String>,
    pub transmissions: Vec<String>,
    pub years: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportancesResponse {
    pub available: bool,
    pub importances: Vec<FeatureImportance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationBody {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ViolationBody>,
}

impl ErrorResponse {
    fn message(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            violations: Vec::new(),
        }
    }
}

impl From<&ValidationError> for ErrorResponse {
    fn from(err: &ValidationError) -> Self {
        Self {
            error: err.to_string(),
            violations: err
                .violations
                .iter()
                .map(|v| ViolationBody {
                    field: v.field.to_string(),
                    message: v.message.clone(),
                })
                .collect(),
        }
    }
}

/// Estimate the price of a single vehicle
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictionRequest>,
) -> Response {
    if let Some(policy) = &state.input_policy {
        if let Err(err) = policy.validate(&request) {
            state.metrics.inc_validation_errors();
            info!(violations = err.violations.len(), "Rejected prediction request");
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::from(&err))).into_response();
        }
    }

    let unknown = FeatureVectorBuilder::unseen_categories(&request, state.predictor.artifact().encoders());
    for field in &unknown {
        state.metrics.inc_unknown_category(field);
        state.logger.log_unknown_category(field, categorical_value(&request, field));
    }

    let start = Instant::now();
    let outcome = state.predictor.estimate(&request);
    state
        .metrics
        .observe_prediction_latency(start.elapsed().as_secs_f64());

    match outcome {
        Ok(result) => {
            state.metrics.inc_predictions();
            state.logger.log_prediction(
                &request.brand,
                request.year,
                result.predicted_price,
                result.price_in_lakhs,
            );
            state.health_registry.set_healthy(components::PREDICTOR).await;
            let body = PredictionResponse {
                predicted_price: result.predicted_price,
                price_in_lakhs: result.price_in_lakhs,
                unknown_categories: unknown.iter().map(|f| f.to_string()).collect(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => {
            state.metrics.inc_prediction_errors();
            state.logger.log_prediction_failed(&request.brand, &err.to_string());
            state
                .health_registry
                .set_degraded(components::PREDICTOR, err.to_string())
                .await;
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::message(err))).into_response()
        }
    }
}

fn categorical_value<'a>(request: &'a PredictionRequest, field: &str) -> &'a str {
    match field {
        "brand" => &request.brand,
        "fuel" => &request.fuel,
        "seller_type" => &request.seller_type,
        "transmission" => &request.transmission,
        _ => "",
    }
}

/// Selection choices for each categorical field plus purchase years
async fn classes(State(state): State<Arc<AppState>>) -> Json<ClassesResponse> {
    let encoders = state.predictor.artifact().encoders();
    let policy = state.input_policy.clone().unwrap_or_default();
    Json(ClassesResponse {
        brands: encoders.brand.classes().to_vec(),
        fuels: encoders.fuel.classes().to_vec(),
        seller_types: encoders.seller_type.classes().to_vec(),
        transmissions: encoders.transmission.classes().to_vec(),
        years: policy.year_choices(),
    })
}

async fn importances(State(state): State<Arc<AppState>>) -> Json<ImportancesResponse> {
    let importances = state.predictor.feature_importances();
    Json(ImportancesResponse {
        available: !importances.is_empty(),
        importances,
    })
}

async fn model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfo> {
    Json(state.predictor.artifact().info())
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::message(e))).into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/classes", get(classes))
        .route("/importances", get(importances))
        .route("/model", get(model_info))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
