//! Document intake: download and sentence-aware chunking

mod chunker;
pub mod fetch;

pub use chunker::{split_into_sentences, TextChunker};
pub use fetch::DocumentFetcher;
