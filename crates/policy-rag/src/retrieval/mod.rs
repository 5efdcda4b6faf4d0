//! Lexical retrieval over document chunks

pub mod search;
pub mod similarity;

pub use search::Retriever;
pub use similarity::{similarity, tokenize};
