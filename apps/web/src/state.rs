use std::sync::Arc;

use crate::llm_client::CompletionModel;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The completion backend. `LlmClient` in production.
    pub model: Arc<dyn CompletionModel>,
    pub sessions: SessionStore,
}
