use utoipa::OpenApi;

use crate::routes::{health, predict};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Petal API",
        version = "1.0.0",
        description = "API for Iris classifier predictions",
        license(name = "MIT")
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "predict", description = "Classifier prediction endpoints")
    ),
    paths(health::health, predict::predict, predict::predict_usage),
    components(schemas(
        health::HealthResponse,
        predict::PredictRequest,
        predict::PredictResponse
    ))
)]
pub struct ApiDoc;
