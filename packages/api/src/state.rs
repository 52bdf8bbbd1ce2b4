use std::sync::Arc;

use petal_ml::ModelStore;

pub type AppState = Arc<State>;

/// Shared state for all request handlers. The model store is the only
/// contended resource in the service.
pub struct State {
    pub store: Arc<ModelStore>,
}

impl State {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self { store }
    }
}
