//! Answer synthesis: prompt, one model call, parse with fallback

use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::providers::LlmProvider;
use crate::types::{QueryAnalysis, ScoredChunk, StructuredAnswer};

use super::parser::parse_structured_answer;
use super::prompt::PromptBuilder;

/// Turns ranked context into a structured answer using an LLM
#[derive(Clone)]
pub struct AnswerSynthesizer {
    llm: Arc<dyn LlmProvider>,
}

impl AnswerSynthesizer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// The underlying generation backend
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    /// Answer `query` from `ranked` context
    ///
    /// Only a failed model call is an error. An unparseable reply degrades
    /// to [`StructuredAnswer::fallback`].
    pub async fn synthesize(
        &self,
        query: &str,
        ranked: &[ScoredChunk],
        analysis: &QueryAnalysis,
    ) -> Result<StructuredAnswer> {
        let start = Instant::now();

        let context = PromptBuilder::build_context(ranked);
        let prompt = PromptBuilder::build_structured_prompt(query, analysis, &context, ranked.len());

        let raw = self.llm.generate(&prompt).await?;

        let mut answer = match parse_structured_answer(&raw, analysis) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Falling back to raw model text: {}", e);
                StructuredAnswer::fallback(&raw, analysis, ranked.len())
            }
        };

        answer.metadata.processing_time_ms = start.elapsed().as_millis() as u64;
        Ok(answer)
    }
}
