//! Text-generation backends
//!
//! The pipeline only sees the [`LlmProvider`] trait, so backends (or a
//! deterministic stub in tests) can be swapped without touching it.

pub mod gemini;
pub mod llm;
pub mod ollama;

use std::sync::Arc;

use crate::config::{BackendProvider, RagConfig};
use crate::error::Result;

pub use gemini::GeminiLlm;
pub use llm::LlmProvider;
pub use ollama::OllamaLlm;

/// Build the configured generation backend
pub fn create_llm_provider(config: &RagConfig) -> Result<Arc<dyn LlmProvider>> {
    let model = config.model_name();

    let provider: Arc<dyn LlmProvider> = match config.backend {
        BackendProvider::Gemini => Arc::new(GeminiLlm::new(&config.llm, model)?),
        BackendProvider::Ollama => Arc::new(OllamaLlm::new(&config.llm, model)?),
    };

    tracing::info!(
        "Using {} backend (model: {})",
        provider.name(),
        provider.model()
    );

    Ok(provider)
}
