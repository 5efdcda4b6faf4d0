//! Answer generation: prompt construction, model call, reply parsing

pub mod parser;
pub mod prompt;
pub mod synthesizer;

pub use parser::{extract_json_object, parse_structured_answer};
pub use prompt::PromptBuilder;
pub use synthesizer::AnswerSynthesizer;
