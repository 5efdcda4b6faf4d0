//! Sentence-aligned text chunking with sentence overlap

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ChunkingConfig;
use crate::types::Chunk;

/// Sentence terminators; a run of them ends one sentence
static SENTENCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

/// Text chunker with configurable size and sentence overlap
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Sentences repeated at the start of the next chunk
    overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.overlap_sentences)
    }

    /// Chunk document text.
    ///
    /// A chunk is closed when the next sentence would push it past
    /// `chunk_size`; the next chunk then starts with the `overlap` sentences
    /// preceding that sentence. A sentence is never split, so a single
    /// sentence longer than `chunk_size` forms its own chunk.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let sentences = split_into_sentences(text);
        let mut chunks = Vec::new();

        let mut current = String::new();
        let mut current_chars = 0usize;
        let mut current_start = 0usize;
        let mut chunk_index = 0u32;

        for (i, sentence) in sentences.iter().enumerate() {
            let sentence_chars = sentence.chars().count();

            if current_chars > 0 && current_chars + sentence_chars > self.chunk_size {
                chunks.push(Chunk::new(
                    current.trim().to_string(),
                    chunk_index,
                    current_start,
                    i,
                ));
                chunk_index += 1;

                // Start new chunk with overlap
                current_start = i.saturating_sub(self.overlap);
                current = self.overlap_text(&sentences[current_start..i]);
                current_chars = current.chars().count();
            }

            current.push_str(sentence);
            current.push(' ');
            current_chars += sentence_chars + 1;
        }

        // Save final chunk
        if !current.trim().is_empty() {
            chunks.push(Chunk::new(
                current.trim().to_string(),
                chunk_index,
                current_start,
                sentences.len(),
            ));
        }

        tracing::debug!(
            "Chunked {} sentences into {} chunks (size {}, overlap {})",
            sentences.len(),
            chunks.len(),
            self.chunk_size,
            self.overlap
        );

        chunks
    }

    /// Overlap prefix for the next chunk
    fn overlap_text(&self, sentences: &[String]) -> String {
        if sentences.is_empty() {
            return String::new();
        }
        let joined: Vec<&str> = sentences
            .iter()
            .map(|s| s.trim_end_matches('.'))
            .collect();
        format!("{}. ", joined.join(". "))
    }
}

/// Split text into trimmed sentences, each re-terminated with a period
pub fn split_into_sentences(text: &str) -> Vec<String> {
    SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("{}.", s))
        .collect()
}
