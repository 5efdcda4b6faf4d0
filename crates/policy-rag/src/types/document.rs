//! Document chunk types

use serde::{Deserialize, Serialize};

/// Position of a chunk within its source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Sequential index, unique within a document
    pub chunk_index: u32,
    /// First sentence in the chunk, overlap sentences included
    pub start_sentence: usize,
    /// One past the last sentence in the chunk
    pub end_sentence: usize,
}

/// A sentence-aligned segment of document text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk ID (`chunk_<index>`)
    pub id: String,
    /// Text content
    pub content: String,
    /// Position metadata
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Create a chunk covering sentences `start_sentence..end_sentence`
    pub fn new(
        content: String,
        chunk_index: u32,
        start_sentence: usize,
        end_sentence: usize,
    ) -> Self {
        Self {
            id: format!("chunk_{}", chunk_index),
            content,
            metadata: ChunkMetadata {
                chunk_index,
                start_sentence,
                end_sentence,
            },
        }
    }
}

/// A chunk scored against one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The retrieved chunk
    #[serde(flatten)]
    pub chunk: Chunk,
    /// Similarity score (0.0-1.0, higher is better)
    pub similarity: f32,
}
