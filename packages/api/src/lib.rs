//! HTTP surface of the Petal prediction service.
//!
//! Routing, request/response DTOs and error mapping only — all model state
//! and inference lives in `petal-ml`.

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error;
pub mod openapi;
mod routes;
pub mod state;

pub use axum;

use state::State;

pub fn construct_router(state: Arc<State>) -> Router {
    Router::new()
        .route("/", get(api_info))
        .nest("/health", routes::health::routes())
        .nest("/predict", routes::predict::routes())
        .with_state(state)
        .merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
}

#[tracing::instrument(name = "GET /")]
async fn api_info() -> Json<Value> {
    Json(json!({
        "message": "Petal prediction API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "predict": "/predict",
            "health": "/health",
            "docs": "/docs"
        }
    }))
}
