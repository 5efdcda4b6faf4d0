//! Application state for the policy Q&A server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::ingestion::DocumentFetcher;
use crate::pipeline::QueryPipeline;
use crate::providers::{create_llm_provider, LlmProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Batch pipeline over the configured backend
    pipeline: QueryPipeline,
    /// Downloader for documents given by URL
    fetcher: DocumentFetcher,
    /// Set once the model backend passed its health check
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state with the backend named in `config`
    pub fn new(config: RagConfig) -> Result<Self> {
        let llm = create_llm_provider(&config)?;
        Self::with_provider(config, llm)
    }

    /// Create state around an existing generation backend
    pub fn with_provider(config: RagConfig, llm: Arc<dyn LlmProvider>) -> Result<Self> {
        let fetcher = DocumentFetcher::new(&config.fetch)?;
        let pipeline = QueryPipeline::from_config(&config, llm);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                fetcher,
                ready: RwLock::new(false),
            }),
        })
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn pipeline(&self) -> &QueryPipeline {
        &self.inner.pipeline
    }

    pub fn fetcher(&self) -> &DocumentFetcher {
        &self.inner.fetcher
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }

    /// Probe the model backend and record the outcome as readiness
    pub async fn check_backend(&self) -> bool {
        let llm = self.inner.pipeline.llm();
        let healthy = match llm.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Health check for {} failed: {}", llm.name(), e);
                false
            }
        };

        if healthy {
            tracing::info!("{} backend is reachable (model: {})", llm.name(), llm.model());
        } else {
            tracing::warn!(
                "{} backend is not reachable; /ready will report 503",
                llm.name()
            );
        }

        self.set_ready(healthy);
        healthy
    }
}
