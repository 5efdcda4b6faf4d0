//! Configuration for the query service

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Generation backend (gemini or ollama)
    pub backend: BackendProvider,
    /// Server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// LLM configuration
    pub llm: LlmConfig,
    /// Document download configuration
    pub fetch: FetchConfig,
    /// Batch pipeline configuration
    pub pipeline: PipelineConfig,
}

impl RagConfig {
    /// Generation model for the selected backend
    pub fn model_name(&self) -> String {
        self.llm
            .model
            .clone()
            .unwrap_or_else(|| self.backend.default_model().to_string())
    }

    /// Load configuration from a TOML file. Missing sections fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("Invalid config file '{}': {}", path.display(), e)))
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("POLICY_RAG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("POLICY_RAG_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid POLICY_RAG_PORT '{}': {}", port, e)))?;
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = Some(key);
            }
        }
        if let Some(url) = lookup("OLLAMA_BASE_URL") {
            self.llm.ollama_base_url = url;
        }
        Ok(())
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be greater than 0".to_string()));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be greater than 0".to_string()));
        }
        if self.pipeline.max_concurrent_questions == 0 {
            return Err(Error::Config(
                "pipeline.max_concurrent_questions must be greater than 0".to_string(),
            ));
        }
        if self.backend == BackendProvider::Gemini
            && self.llm.api_key.as_deref().map_or(true, |k| k.trim().is_empty())
        {
            return Err(Error::Config(
                "Gemini backend selected but no API key configured (set GEMINI_API_KEY)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_body_size: 20 * 1024 * 1024, // 20MB of inline document text
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters (a single longer sentence still forms one chunk)
    pub chunk_size: usize,
    /// Number of trailing sentences repeated at the start of the next chunk
    pub overlap_sentences: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap_sentences: 2,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks passed to the model per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// LLM configuration shared by both backends
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Gemini API base URL
    pub gemini_base_url: String,
    /// Gemini API key (usually supplied through GEMINI_API_KEY)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Ollama base URL
    pub ollama_base_url: String,
    /// Generation model name (backend default when unset)
    pub model: Option<String>,
    /// Temperature for generation
    pub temperature: f32,
    /// Top-k sampling (Gemini only)
    pub top_k: u32,
    /// Nucleus sampling (Gemini only)
    pub top_p: f32,
    /// Maximum output tokens (Gemini only)
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retries for failed requests (0 = single attempt)
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: None,
            ollama_base_url: "http://localhost:11434".to_string(),
            model: None,
            temperature: 0.3,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
            timeout_secs: 60,
            max_retries: 0,
        }
    }
}

/// Document download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum document size in bytes
    pub max_document_bytes: usize,
    /// Download timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: 10 * 1024 * 1024, // 10MB
            timeout_secs: 30,
        }
    }
}

/// Batch pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Questions processed at once; 1 keeps processing strictly sequential
    pub max_concurrent_questions: usize,
    /// Version string reported in batch metadata
    pub system_version: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_questions: 1,
            system_version: "HackRx-RAG-v1.0".to_string(),
        }
    }
}

/// Generation backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    /// Google Generative Language API (API key auth)
    #[default]
    Gemini,
    /// Local Ollama server
    Ollama,
}

impl BackendProvider {
    /// Model used when none is configured
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::Ollama => "phi3",
        }
    }
}

impl std::str::FromStr for BackendProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(Error::Config(format!("Unknown backend: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.overlap_sentences, 2);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.pipeline.max_concurrent_questions, 1);
        assert_eq!(config.pipeline.system_version, "HackRx-RAG-v1.0");
        assert_eq!(config.backend, BackendProvider::Gemini);
        assert_eq!(config.model_name(), "gemini-1.5-flash");
    }

    #[test]
    fn test_partial_toml() {
        let config: RagConfig = toml::from_str(
            r#"
backend = "ollama"

[chunking]
chunk_size = 400

[llm]
model = "llama3.2:3b"
"#,
        )
        .unwrap();

        assert_eq!(config.backend, BackendProvider::Ollama);
        assert_eq!(config.chunking.chunk_size, 400);
        assert_eq!(config.chunking.overlap_sentences, 2);
        assert_eq!(config.llm.model.as_deref(), Some("llama3.2:3b"));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("POLICY_RAG_PORT", "9000"),
            ("GEMINI_API_KEY", "secret"),
        ]
        .into_iter()
        .collect();

        let mut config = RagConfig::default();
        config
            .apply_env_from(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.api_key.as_deref(), Some("secret"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut config = RagConfig::default();
        let result = config.apply_env_from(|k| (k == "POLICY_RAG_PORT").then(|| "nope".to_string()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate() {
        let config = RagConfig::default();
        assert!(config.validate().is_err(), "gemini without key");

        let mut config = RagConfig {
            backend: BackendProvider::Ollama,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("Ollama".parse::<BackendProvider>().unwrap(), BackendProvider::Ollama);
        assert!("openai".parse::<BackendProvider>().is_err());
    }
}
