//! Query request and analysis types

use serde::{Deserialize, Serialize};

/// Coarse intent of a question, used to condition the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    /// What a policy covers or which benefits apply
    CoverageQuery,
    /// Waiting or grace periods
    PeriodQuery,
    /// Conditions and requirements
    ConditionQuery,
    /// Limits and amounts
    LimitQuery,
    /// Anything else
    #[default]
    GeneralQuery,
}

impl QueryIntent {
    /// Wire name, as used in prompts and answer metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoverageQuery => "coverage_query",
            Self::PeriodQuery => "period_query",
            Self::ConditionQuery => "condition_query",
            Self::LimitQuery => "limit_query",
            Self::GeneralQuery => "general_query",
        }
    }
}

impl std::fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signals extracted from a single question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    /// Classified intent
    pub intent: QueryIntent,
    /// Domain vocabulary terms found in the question
    pub entities: Vec<String>,
    /// Content-bearing words of the question, in order
    pub keywords: Vec<String>,
}

/// Batch request accepted by the HTTP layer
///
/// The document is given either inline (`document_text`) or as a URL to
/// download (`documents`). Inline text wins when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchRequest {
    /// URL of the document to download
    #[serde(default)]
    pub documents: Option<String>,

    /// Already extracted document text
    #[serde(default, alias = "documentText")]
    pub document_text: Option<String>,

    /// Questions to answer, in order
    #[serde(default)]
    pub questions: Option<Vec<String>>,
}

impl BatchRequest {
    /// Create a request over inline document text
    pub fn with_text(document_text: impl Into<String>, questions: Vec<String>) -> Self {
        Self {
            documents: None,
            document_text: Some(document_text.into()),
            questions: Some(questions),
        }
    }

    /// Create a request over a document URL
    pub fn with_url(url: impl Into<String>, questions: Vec<String>) -> Self {
        Self {
            documents: Some(url.into()),
            document_text: None,
            questions: Some(questions),
        }
    }
}
