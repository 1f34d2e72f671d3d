use std::sync::Arc;

use crate::config::Config;
use crate::generation::client::TextGenerator;
use crate::scoring::SentenceEmbedder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Loaded once at startup and shared read-only; never rebuilt per request.
    pub embedder: Arc<dyn SentenceEmbedder>,
    /// Pluggable generation backend. Default: CommandGenerator.
    pub generator: Arc<dyn TextGenerator>,
}
