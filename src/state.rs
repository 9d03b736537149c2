use std::sync::Arc;

use crate::{db::Store, services::providers::TextGenerator};

/// Shared application state
///
/// Both collaborators sit behind trait objects so tests can swap in an
/// in-memory store and a scripted generator.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { store, generator }
    }
}
