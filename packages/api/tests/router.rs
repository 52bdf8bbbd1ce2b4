//! HTTP-level tests driving the real router with `tower::ServiceExt`.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use ndarray::array;
use petal_api::state::State;
use petal_api::construct_router;
use petal_ml::{CLASS_NAMES, GaussianNb, ModelArtifact, ModelStore};
use serde_json::{Value, json};
use tower::ServiceExt;

fn router_with_store(store: ModelStore) -> Router {
    construct_router(Arc::new(State::new(Arc::new(store))))
}

/// Router whose store points at a directory with no artifact in it.
fn router_without_model(dir: &Path) -> Router {
    router_with_store(ModelStore::new(dir.join("model.msgpack")))
}

/// Router backed by a small iris-shaped model written to `dir`.
fn router_with_model(dir: &Path) -> Router {
    let records = array![
        [5.0, 3.4, 1.5, 0.2],
        [5.1, 3.5, 1.4, 0.3],
        [4.9, 3.3, 1.5, 0.2],
        [6.0, 2.8, 4.5, 1.4],
        [6.1, 2.9, 4.6, 1.3],
        [5.9, 2.7, 4.4, 1.4],
        [7.0, 3.1, 6.0, 2.2],
        [7.1, 3.2, 6.1, 2.1],
        [6.9, 3.0, 5.9, 2.3],
    ];
    let targets = array![0, 0, 0, 1, 1, 1, 2, 2, 2];
    let model = GaussianNb::fit(records.view(), targets.view()).unwrap();
    let classes = CLASS_NAMES.iter().map(ToString::to_string).collect();
    let path = dir.join("model.msgpack");
    ModelArtifact::new(model, classes).save(&path).unwrap();
    router_with_store(ModelStore::new(path))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_predict(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn root_lists_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let app = router_without_model(dir.path());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["endpoints"]["predict"], "/predict");
    assert_eq!(body["endpoints"]["health"], "/health");
}

#[tokio::test]
async fn health_reports_not_loaded_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let app = router_without_model(dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_loaded"], false);
}

#[tokio::test]
async fn health_does_not_force_a_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ModelStore::new(dir.path().join("model.msgpack")));
    let app = construct_router(Arc::new(State::new(store.clone())));

    app.oneshot(
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();
    assert!(!store.is_loaded().await);
}

#[tokio::test]
async fn predict_without_model_is_service_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let app = router_without_model(dir.path());

    let response = app
        .oneshot(post_predict(json!({"features": [5.1, 3.5, 1.4, 0.2]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
    // No internal paths in the public message.
    let message = body["error"]["message"].as_str().unwrap();
    assert!(!message.contains("model.msgpack"));
}

#[tokio::test]
async fn predict_rejects_wrong_arity() {
    let dir = tempfile::tempdir().unwrap();

    for features in [json!([5.1, 3.5, 1.4]), json!([5.1, 3.5, 1.4, 0.2, 9.9])] {
        let app = router_with_model(dir.path());
        let response = app
            .oneshot(post_predict(json!({ "features": features })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }
}

#[tokio::test]
async fn predict_returns_consistent_class_fields() {
    let dir = tempfile::tempdir().unwrap();
    let app = router_with_model(dir.path());

    let response = app
        .oneshot(post_predict(json!({"features": [5.0, 3.4, 1.5, 0.2]})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let prediction = body["prediction"].as_u64().unwrap() as usize;
    let class_name = body["class_name"].as_str().unwrap();
    assert_eq!(class_name, CLASS_NAMES[prediction]);

    let proba = body["prediction_proba"].as_array().unwrap();
    assert_eq!(proba.len(), 3);
    let sum: f64 = proba.iter().map(|p| p.as_f64().unwrap()).sum();
    assert!((sum - 1.0).abs() < 1e-2);
}

#[tokio::test]
async fn predict_get_shows_usage() {
    let dir = tempfile::tempdir().unwrap();
    let app = router_without_model(dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/predict")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["usage"]["method"], "POST");
}
