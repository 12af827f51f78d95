//! Integration tests for the price server API endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use price_server::api::{create_router, AppState};
use pricing_lib::{
    health::{components, HealthRegistry},
    models::NUM_FEATURES,
    observability::{PricingMetrics, StructuredLogger},
    regressor::LinearRegressor,
    ArtifactCache, Encoders, InputPolicy, ModelArtifact, Predictor,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/car_price_model.json");

async fn state_for(predictor: Predictor) -> AppState {
    let health_registry = HealthRegistry::new();
    health_registry.register(components::ARTIFACT).await;
    health_registry.register(components::PREDICTOR).await;
    health_registry
        .record_artifact_load::<()>(&Ok(()))
        .await;
    AppState::new(
        predictor,
        health_registry,
        PricingMetrics::new(),
        StructuredLogger::new("price-server-test"),
    )
}

async fn setup_test_app() -> (Router, Arc<AppState>) {
    let predictor = ArtifactCache::new(FIXTURE).predictor().unwrap();
    let state = Arc::new(state_for(predictor).await);
    (create_router(state.clone()), state)
}

fn sample_request() -> Value {
    json!({
        "brand": "Maruti",
        "year": 2020,
        "km_driven": 40000,
        "fuel": "Diesel",
        "seller_type": "Dealer",
        "transmission": "Manual",
        "owner": 1,
        "mileage": 18.0,
        "engine": 1200,
        "max_power": 90.0,
        "seats": 5
    })
}

async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_predict_returns_price_and_lakhs() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = post_json(app, "/predict", &sample_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_price"], 750000.0);
    assert_eq!(body["price_in_lakhs"], 7.5);
    assert_eq!(body["unknown_categories"], json!([]));
}

#[tokio::test]
async fn test_predict_with_unseen_brand_still_succeeds() {
    let (app, _state) = setup_test_app().await;
    let mut request = sample_request();
    request["brand"] = json!("Tesla");

    let (status, body) = post_json(app, "/predict", &request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unknown_categories"], json!(["brand"]));
    let price = body["predicted_price"].as_f64().unwrap();
    assert_eq!(body["price_in_lakhs"].as_f64().unwrap(), price / 100000.0);
}

#[tokio::test]
async fn test_predict_is_repeatable() {
    let (app, _state) = setup_test_app().await;
    let (_, first) = post_json(app.clone(), "/predict", &sample_request()).await;
    let (_, second) = post_json(app, "/predict", &sample_request()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_predict_rejects_missing_field() {
    let (app, _state) = setup_test_app().await;
    let mut request = sample_request();
    request.as_object_mut().unwrap().remove("seats");

    let (status, _) = post_json(app, "/predict", &request).await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_strict_inputs_reject_out_of_range_values() {
    let predictor = ArtifactCache::new(FIXTURE).predictor().unwrap();
    let state = Arc::new(state_for(predictor).await.with_input_policy(InputPolicy::default()));
    let app = create_router(state);

    let mut request = sample_request();
    request["mileage"] = json!(-4.0);
    request["seats"] = json!(3);

    let (status, body) = post_json(app, "/predict", &request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["mileage", "seats"]);
}

#[tokio::test]
async fn test_lenient_inputs_accept_out_of_range_values() {
    let (app, _state) = setup_test_app().await;
    let mut request = sample_request();
    request["mileage"] = json!(-4.0);

    let (status, _) = post_json(app, "/predict", &request).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_prediction_failure_is_reported_and_isolated() {
    let encoders = Encoders {
        brand: pricing_lib::CategoricalEncoder::from_labels(["Maruti"]),
        fuel: pricing_lib::CategoricalEncoder::from_labels(["Diesel"]),
        seller_type: pricing_lib::CategoricalEncoder::from_labels(["Dealer"]),
        transmission: pricing_lib::CategoricalEncoder::from_labels(["Manual"]),
    };
    let linear = LinearRegressor::new(0.0, vec![f64::MAX; NUM_FEATURES]).unwrap();
    let artifact = ModelArtifact::new(Box::new(linear), encoders).unwrap();
    let state = Arc::new(state_for(Predictor::new(Arc::new(artifact))).await);
    let app = create_router(state.clone());

    let (status, body) = post_json(app.clone(), "/predict", &sample_request()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("prediction failed"));

    // The service keeps answering and reports the predictor as degraded
    let (status, health) = get_json(app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "degraded");
}

#[tokio::test]
async fn test_classes_are_sorted_choices() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get_json(app, "/classes").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fuels"], json!(["CNG", "Diesel", "Electric", "Petrol"]));
    assert_eq!(body["transmissions"], json!(["Automatic", "Manual"]));
    assert_eq!(body["brands"].as_array().unwrap().len(), 10);
    let years = body["years"].as_array().unwrap();
    assert_eq!(years.last().unwrap(), 2005);
}

#[tokio::test]
async fn test_importances_in_feature_order() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get_json(app, "/importances").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], true);
    let importances = body["importances"].as_array().unwrap();
    assert_eq!(importances.len(), 11);
    assert_eq!(importances[0]["feature"], "year");
    assert_eq!(importances[0]["score"], 0.28);
    assert_eq!(importances[10]["feature"], "seats");
}

#[tokio::test]
async fn test_importances_unavailable_for_linear_model() {
    let encoders = Encoders {
        brand: pricing_lib::CategoricalEncoder::from_labels(["Maruti"]),
        fuel: pricing_lib::CategoricalEncoder::from_labels(["Diesel"]),
        seller_type: pricing_lib::CategoricalEncoder::from_labels(["Dealer"]),
        transmission: pricing_lib::CategoricalEncoder::from_labels(["Manual"]),
    };
    let linear = LinearRegressor::new(500_000.0, vec![0.0; NUM_FEATURES]).unwrap();
    let artifact = ModelArtifact::new(Box::new(linear), encoders).unwrap();
    let state = Arc::new(state_for(Predictor::new(Arc::new(artifact))).await);

    let (status, body) = get_json(create_router(state), "/importances").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], false);
    assert_eq!(body["importances"], json!([]));
}

#[tokio::test]
async fn test_model_info() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get_json(app, "/model").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["algorithm"], "random_forest");
    assert_eq!(body["n_estimators"], 3);
    assert_eq!(body["n_features"], 11);
    assert_eq!(body["checksum"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_healthz_and_readyz_when_loaded() {
    let (app, _state) = setup_test_app().await;

    let (status, health) = get_json(app.clone(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");

    let (status, ready) = get_json(app, "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ready["ready"], true);
}

#[tokio::test]
async fn test_readyz_unavailable_after_failed_load() {
    let (app, state) = setup_test_app().await;
    let failed: Result<(), pricing_lib::ArtifactError> =
        Err(pricing_lib::ArtifactError::corrupt("le_fuel", "is missing"));
    state.health_registry.record_artifact_load(&failed).await;

    let (status, ready) = get_json(app.clone(), "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(ready["ready"], false);

    let (status, _) = get_json(app, "/healthz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_prediction_counters() {
    let (app, _state) = setup_test_app().await;
    let _ = post_json(app.clone(), "/predict", &sample_request()).await;

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("car_price_predictions_total"));
    assert!(text.contains("car_price_prediction_latency_seconds"));
}

#[tokio::test]
async fn test_corrupt_artifact_on_disk_keeps_service_unready() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("car_price_model.json");
    std::fs::write(&path, r#"{"model": {"kind": "linear", "intercept": 0.0}}"#).unwrap();

    let cache = ArtifactCache::new(&path);
    let outcome = cache.get();
    assert!(outcome.is_err());

    let (app, state) = setup_test_app().await;
    state.health_registry.record_artifact_load(&outcome).await;

    let (status, ready) = get_json(app, "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(ready["ready"], false);
}
