//! Prompt templates for structured answer generation

use crate::types::{QueryAnalysis, ScoredChunk};

/// Prompt builder for policy questions
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the context block from ranked chunks, in rank order
    pub fn build_context(ranked: &[ScoredChunk]) -> String {
        ranked
            .iter()
            .enumerate()
            .map(|(i, scored)| {
                format!(
                    "[Relevant Context {}] (Similarity: {:.3})\n{}",
                    i + 1,
                    scored.similarity,
                    scored.chunk.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the full prompt asking for a JSON answer
    pub fn build_structured_prompt(
        question: &str,
        analysis: &QueryAnalysis,
        context: &str,
        sources_used: usize,
    ) -> String {
        format!(
            r#"You are an intelligent document analysis system. Analyze the following query and provide a structured response.

Query: "{question}"
Query Intent: {intent}
Extracted Entities: {entities}
Keywords: {keywords}

Relevant Document Context:
{context}

Provide a structured JSON response with the following format:
{{
  "answer": "Direct answer to the question",
  "confidence": 0.95,
  "reasoning": "Explanation of how the answer was derived",
  "relevant_clauses": [
    {{
      "clause_id": "section_x",
      "clause_text": "Exact text from document",
      "relevance_score": 0.9
    }}
  ],
  "entities_found": ["entity1", "entity2"],
  "decision_factors": [
    {{
      "factor": "Specific condition or requirement",
      "status": "met/not_met/conditional",
      "explanation": "Why this factor applies"
    }}
  ],
  "metadata": {{
    "query_type": "{intent}",
    "processing_time_ms": 150,
    "sources_used": {sources_used}
  }}
}}

Ensure your response is valid JSON and provides clear, actionable information."#,
            question = question,
            intent = analysis.intent,
            entities = analysis.entities.join(", "),
            keywords = analysis.keywords.join(", "),
            context = context,
            sources_used = sources_used,
        )
    }
}
