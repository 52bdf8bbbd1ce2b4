use axum::Json;
use axum::extract::State;
use axum::{Router, routing::get};
use petal_ml::{FEATURE_COUNT, FEATURE_NAMES, Prediction};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(predict_usage).post(predict))
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PredictRequest {
    /// Exactly 4 features: [sepal_length, sepal_width, petal_length, petal_width]
    pub features: Vec<f64>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PredictResponse {
    /// Predicted class index (0: setosa, 1: versicolor, 2: virginica)
    pub prediction: usize,
    /// Prediction probability for each class
    pub prediction_proba: Vec<f64>,
    /// Name of the predicted class
    pub class_name: String,
}

impl From<Prediction> for PredictResponse {
    fn from(p: Prediction) -> Self {
        Self {
            prediction: p.class_index,
            prediction_proba: p.probabilities,
            class_name: p.class_name,
        }
    }
}

#[utoipa::path(
    post,
    path = "/predict",
    tag = "predict",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Predicted class with per-class probabilities", body = PredictResponse),
        (status = 400, description = "Malformed feature vector"),
        (status = 503, description = "No trained model available yet")
    )
)]
#[tracing::instrument(name = "POST /predict", skip(state, request))]
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    // Request-level validation; the core re-checks the same constraint.
    if request.features.len() != FEATURE_COUNT {
        return Err(ApiError::bad_request(format!(
            "Exactly {} features are required: {:?}",
            FEATURE_COUNT, FEATURE_NAMES
        )));
    }

    let prediction = petal_ml::predict(&state.store, &request.features).await?;
    Ok(Json(prediction.into()))
}

#[utoipa::path(
    get,
    path = "/predict",
    tag = "predict",
    responses(
        (status = 200, description = "Usage instructions for the predict endpoint")
    )
)]
#[tracing::instrument(name = "GET /predict")]
pub async fn predict_usage() -> Json<Value> {
    Json(json!({
        "message": "This endpoint requires POST method",
        "usage": {
            "method": "POST",
            "url": "/predict",
            "headers": { "Content-Type": "application/json" },
            "body": { "features": [5.1, 3.5, 1.4, 0.2] },
            "example_curl": "curl -X POST 'http://127.0.0.1:8001/predict' -H 'Content-Type: application/json' -d '{\"features\": [5.1, 3.5, 1.4, 0.2]}'",
            "interactive_docs": "/docs"
        },
        "note": "Visit /docs for interactive API documentation"
    }))
}
