//! Rule-based query analysis: intent, entities, keywords
//!
//! Intent rules are all evaluated in table order and each match overwrites
//! the previous one, so the *last* matching rule wins. "What is the waiting
//! period limit?" is therefore a `limit_query`, not a `period_query`.

use crate::retrieval::tokenize;
use crate::types::{QueryAnalysis, QueryIntent};

/// Intent rules, in evaluation order
pub const INTENT_RULES: &[(QueryIntent, &[&str])] = &[
    (QueryIntent::CoverageQuery, &["cover", "benefit"]),
    (QueryIntent::PeriodQuery, &["waiting period", "grace period"]),
    (QueryIntent::ConditionQuery, &["condition", "requirement"]),
    (QueryIntent::LimitQuery, &["limit", "amount"]),
];

pub const MEDICAL_TERMS: &[&str] = &[
    "surgery",
    "treatment",
    "disease",
    "procedure",
    "condition",
    "diagnosis",
];

pub const FINANCIAL_TERMS: &[&str] = &[
    "premium",
    "deductible",
    "copay",
    "limit",
    "amount",
    "discount",
];

pub const TEMPORAL_TERMS: &[&str] = &["period", "waiting", "grace", "term", "duration"];

/// Words dropped from keyword extraction
pub const STOP_WORDS: &[&str] = &[
    "what", "does", "this", "policy", "under", "from", "with", "that", "they", "have", "been",
];

/// Keywords must be longer than this many characters
const MIN_KEYWORD_LEN: usize = 3;

/// Derives intent, entity and keyword signals from a question
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryAnalyzer;

impl QueryAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a question. Deterministic; never fails.
    pub fn analyze(&self, question: &str) -> QueryAnalysis {
        let lower = question.to_lowercase();

        QueryAnalysis {
            intent: classify_intent(&lower),
            entities: extract_entities(&lower),
            keywords: extract_keywords(&lower),
        }
    }
}

/// Last matching rule in [`INTENT_RULES`] wins; `general_query` if none match
fn classify_intent(lower: &str) -> QueryIntent {
    let mut intent = QueryIntent::GeneralQuery;
    for (candidate, patterns) in INTENT_RULES {
        if patterns.iter().any(|p| lower.contains(p)) {
            intent = *candidate;
        }
    }
    intent
}

fn extract_entities(lower: &str) -> Vec<String> {
    MEDICAL_TERMS
        .iter()
        .chain(FINANCIAL_TERMS)
        .chain(TEMPORAL_TERMS)
        .filter(|term| lower.contains(*term))
        .map(|term| term.to_string())
        .collect()
}

fn extract_keywords(lower: &str) -> Vec<String> {
    tokenize(lower)
        .into_iter()
        .filter(|word| word.chars().count() > MIN_KEYWORD_LEN)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(q: &str) -> QueryAnalysis {
        QueryAnalyzer::new().analyze(q)
    }

    #[test]
    fn test_period_query() {
        let analysis = analyze("What is the waiting period for cataract surgery?");

        assert_eq!(analysis.intent, QueryIntent::PeriodQuery);
        assert!(analysis.entities.contains(&"surgery".to_string()));
        assert!(analysis.entities.contains(&"period".to_string()));
        assert!(analysis.entities.contains(&"waiting".to_string()));
        assert_eq!(
            analysis.keywords,
            vec!["waiting", "period", "cataract", "surgery"]
        );
    }

    #[test]
    fn test_last_match_wins() {
        // coverage and limit both match; limit is later in the table
        assert_eq!(
            analyze("Does the policy cover surgery up to a limit?").intent,
            QueryIntent::LimitQuery
        );
        // period and condition both match
        assert_eq!(
            analyze("Which conditions have a waiting period?").intent,
            QueryIntent::ConditionQuery
        );
        assert_eq!(
            analyze("Is maternity a covered benefit?").intent,
            QueryIntent::CoverageQuery
        );
    }

    #[test]
    fn test_general_query_default() {
        let analysis = analyze("Who is the insurer?");
        assert_eq!(analysis.intent, QueryIntent::GeneralQuery);
        assert!(analysis.entities.is_empty());
        assert_eq!(analysis.keywords, vec!["insurer"]);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            analyze("GRACE PERIOD for PREMIUM payment").intent,
            QueryIntent::PeriodQuery
        );
        assert_eq!(
            analyze("GRACE PERIOD for PREMIUM payment").entities,
            vec!["premium", "period", "grace"]
        );
    }

    #[test]
    fn test_entities_follow_vocabulary_order() {
        let analysis = analyze("Deductible amount after surgery during the term");
        assert_eq!(
            analysis.entities,
            vec!["surgery", "deductible", "amount", "term"]
        );
    }

    #[test]
    fn test_stop_words_and_short_tokens_dropped() {
        let analysis = analyze("What does this policy say about that with them?");
        assert_eq!(analysis.keywords, vec!["about", "them"]);
    }

    #[test]
    fn test_keywords_keep_duplicates() {
        let analysis = analyze("room rent and room charges");
        assert_eq!(analysis.keywords, vec!["room", "rent", "room", "charges"]);
    }
}
