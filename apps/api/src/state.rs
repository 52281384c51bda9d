use std::sync::Arc;

use crate::screening::ScreeningPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The batch screening pipeline. Holds the LLM client behind its
    /// `Arc<dyn CompletionClient>` seam.
    pub pipeline: Arc<ScreeningPipeline>,
}
