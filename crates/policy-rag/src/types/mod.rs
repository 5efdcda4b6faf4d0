//! Core types for the query pipeline

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, ChunkMetadata, ScoredChunk};
pub use query::{BatchRequest, QueryAnalysis, QueryIntent};
pub use response::{
    AnswerMetadata, BatchResult, DecisionFactor, FactorStatus, RelevantClause, StructuredAnswer,
    SystemMetadata,
};
