#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::sync::Arc;

use petal_api::{construct_router, state::State};
use petal_ml::ModelStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Petal prediction API");

    let config = config::Config::from_env()?;

    let store = Arc::new(ModelStore::from_env());
    tracing::info!(path = %store.path().display(), "Model artifact path");

    // Best-effort warm-up: a missing artifact defers loading to the first
    // prediction request and must not prevent startup.
    match store.load().await {
        Ok(_) => tracing::info!("Model loaded on startup"),
        Err(err) => tracing::warn!(
            "Model not loaded on startup, deferring to first request: {err}"
        ),
    }

    let state = Arc::new(State::new(store));
    let app = construct_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
