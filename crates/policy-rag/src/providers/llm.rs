//! LLM provider trait for text generation

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

/// Text-generation capability used by the answer synthesizer
///
/// Implementations:
/// - `GeminiLlm`: Google Generative Language API (gemini-1.5-flash)
/// - `OllamaLlm`: Local Ollama server (phi3, llama3, etc.)
///
/// Any transport failure, non-success status or reply without text must be
/// reported as [`Error::ModelUnavailable`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one prompt and return the raw generated text
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}

/// Run `operation` up to `max_retries + 1` times with exponential backoff
pub(crate) async fn retry_request<F, Fut, T>(max_retries: u32, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error = None;

    for attempt in 0..=max_retries {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if attempt < max_retries {
                    let delay = Duration::from_secs(2u64.pow(attempt));
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}, retrying in {:?}",
                        attempt + 1,
                        max_retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| Error::model_unavailable("Unknown error")))
}
