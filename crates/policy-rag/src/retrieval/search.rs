//! Top-K chunk ranking

use std::cmp::Ordering;

use crate::config::RetrievalConfig;
use crate::types::{Chunk, ScoredChunk};

use super::similarity::similarity;

/// Ranks chunks against a question by lexical similarity
#[derive(Debug, Clone)]
pub struct Retriever {
    top_k: usize,
}

impl Default for Retriever {
    fn default() -> Self {
        Self::from_config(&RetrievalConfig::default())
    }
}

impl Retriever {
    /// Create a retriever returning at most `top_k` chunks
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Create a retriever from configuration
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.top_k)
    }

    /// Score every chunk against `query` and return the best `top_k`,
    /// highest similarity first. Ties keep document order.
    pub fn retrieve(&self, query: &str, chunks: &[Chunk]) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = chunks
            .iter()
            .map(|chunk| ScoredChunk {
                similarity: similarity(query, &chunk.content),
                chunk: chunk.clone(),
            })
            .collect();

        // Stable sort preserves chunk order among equal scores
        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        scored.truncate(self.top_k);

        tracing::debug!(
            "Retrieved {} of {} chunks (best similarity {:.3})",
            scored.len(),
            chunks.len(),
            scored.first().map(|s| s.similarity).unwrap_or(0.0)
        );

        scored
    }
}
