//! policy-rag: question answering over a single policy document
//!
//! A batch of questions is answered against one document: the text is split
//! into overlapping sentence-aligned chunks, each question is classified and
//! matched to chunks by lexical similarity, and an LLM turns the best chunks
//! into a structured answer with confidence, clauses and decision factors.
//! Malformed model output degrades to a fallback answer and a failed question
//! never aborts its batch.

pub mod analysis;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::QueryPipeline;
pub use providers::LlmProvider;
pub use types::{BatchRequest, BatchResult, Chunk, QueryAnalysis, QueryIntent, StructuredAnswer};
