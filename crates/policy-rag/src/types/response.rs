//! Answer and batch response types

use serde::{Deserialize, Serialize};

use super::query::QueryAnalysis;

/// Confidence assigned when the model reply could not be parsed
pub const FALLBACK_CONFIDENCE: f32 = 0.7;

/// `query_type` reported for questions that failed to process
pub const ERROR_QUERY_TYPE: &str = "error";

/// Document passage the model relied on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelevantClause {
    /// Clause or section identifier
    pub clause_id: String,
    /// Text quoted from the document
    pub clause_text: String,
    /// Relevance to the question (0.0-1.0)
    pub relevance_score: f32,
}

/// Outcome of a single decision factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorStatus {
    Met,
    NotMet,
    #[default]
    Conditional,
}

impl FactorStatus {
    /// Lenient parse of a model-provided status; unknown values are conditional
    pub fn parse_lenient(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();

        match normalized.as_str() {
            "met" => Self::Met,
            "not_met" | "unmet" => Self::NotMet,
            _ => Self::Conditional,
        }
    }
}

/// A condition or requirement weighed in the answer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionFactor {
    /// The condition or requirement
    pub factor: String,
    /// Whether it is satisfied
    pub status: FactorStatus,
    /// Why it applies
    pub explanation: String,
}

/// Per-answer metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerMetadata {
    /// Intent name, or `"error"` for failed questions
    pub query_type: String,
    /// Time spent on this question in milliseconds
    pub processing_time_ms: u64,
    /// Number of chunks given to the model
    pub sources_used: usize,
    /// Failure message (error placeholders only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Structured answer to one question
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredAnswer {
    /// Direct answer text
    pub answer: String,
    /// Confidence (0.0-1.0)
    pub confidence: f32,
    /// How the answer was derived
    pub reasoning: String,
    /// Supporting passages, most relevant first
    pub relevant_clauses: Vec<RelevantClause>,
    /// Entities the model found
    pub entities_found: Vec<String>,
    /// Conditions weighed in the answer
    pub decision_factors: Vec<DecisionFactor>,
    /// Answer metadata
    pub metadata: AnswerMetadata,
}

impl StructuredAnswer {
    /// Degraded answer used when the model reply is not parseable JSON
    pub fn fallback(raw_text: &str, analysis: &QueryAnalysis, sources_used: usize) -> Self {
        Self {
            answer: raw_text.to_string(),
            confidence: FALLBACK_CONFIDENCE,
            reasoning: "parsing fallback".to_string(),
            relevant_clauses: Vec::new(),
            entities_found: analysis.entities.clone(),
            decision_factors: Vec::new(),
            metadata: AnswerMetadata {
                query_type: analysis.intent.as_str().to_string(),
                processing_time_ms: 0,
                sources_used,
                error: None,
            },
        }
    }

    /// Zero-confidence placeholder for a question that failed to process
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            answer: format!("Failed to process this question: {}", message),
            confidence: 0.0,
            reasoning: "Processing error occurred".to_string(),
            relevant_clauses: Vec::new(),
            entities_found: Vec::new(),
            decision_factors: Vec::new(),
            metadata: AnswerMetadata {
                query_type: ERROR_QUERY_TYPE.to_string(),
                processing_time_ms: 0,
                sources_used: 0,
                error: Some(message),
            },
        }
    }

    /// Whether this is an error placeholder
    pub fn is_error(&self) -> bool {
        self.metadata.error.is_some()
    }
}

/// Batch-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetadata {
    /// Wall time from batch start to the last answer
    pub total_processing_time_ms: u64,
    /// Chunks produced from the document
    pub document_chunks_created: usize,
    /// Number of questions answered (including failures)
    pub questions_processed: usize,
    /// Mean confidence over all answers, error placeholders included
    pub avg_confidence: f32,
    /// Service version string
    pub system_version: String,
}

/// Response for a document + question batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Plain answers, parallel to `structured_responses`
    pub answers: Vec<String>,
    /// One structured answer per question, in input order
    pub structured_responses: Vec<StructuredAnswer>,
    /// Batch metadata
    pub system_metadata: SystemMetadata,
}

impl BatchResult {
    /// Assemble a batch result from ordered per-question answers
    pub fn new(
        structured_responses: Vec<StructuredAnswer>,
        document_chunks_created: usize,
        total_processing_time_ms: u64,
        system_version: impl Into<String>,
    ) -> Self {
        let avg_confidence = if structured_responses.is_empty() {
            0.0
        } else {
            structured_responses.iter().map(|r| r.confidence).sum::<f32>()
                / structured_responses.len() as f32
        };

        Self {
            answers: structured_responses.iter().map(|r| r.answer.clone()).collect(),
            system_metadata: SystemMetadata {
                total_processing_time_ms,
                document_chunks_created,
                questions_processed: structured_responses.len(),
                avg_confidence,
                system_version: system_version.into(),
            },
            structured_responses,
        }
    }

    /// Number of questions that failed to process
    pub fn error_count(&self) -> usize {
        self.structured_responses.iter().filter(|r| r.is_error()).count()
    }
}
