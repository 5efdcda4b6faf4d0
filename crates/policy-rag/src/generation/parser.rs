//! Parsing of model replies into structured answers
//!
//! Models wrap their JSON in prose or markdown fences and drift on field
//! types, so the reply is located by brace matching and then coerced field
//! by field from a [`serde_json::Value`] instead of a strict derive.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::types::{
    AnswerMetadata, DecisionFactor, FactorStatus, QueryAnalysis, RelevantClause,
    StructuredAnswer,
};

/// Return the first balanced `{...}` substring of `text`
///
/// Braces inside JSON string literals (and escaped quotes within them) are
/// ignored. Returns `None` if no object closes.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse a raw model reply
///
/// Fails with [`Error::MalformedModelOutput`] when no JSON object can be
/// found or parsed; callers fall back to [`StructuredAnswer::fallback`].
pub fn parse_structured_answer(raw: &str, analysis: &QueryAnalysis) -> Result<StructuredAnswer> {
    let json = extract_json_object(raw)
        .ok_or_else(|| Error::MalformedModelOutput("no JSON object in model reply".to_string()))?;

    let value: Value = serde_json::from_str(json)
        .map_err(|e| Error::MalformedModelOutput(format!("invalid JSON: {}", e)))?;

    let obj = value
        .as_object()
        .ok_or_else(|| Error::MalformedModelOutput("reply is not a JSON object".to_string()))?;

    let metadata = obj.get("metadata").and_then(Value::as_object);

    Ok(StructuredAnswer {
        answer: text(obj.get("answer")),
        confidence: unit_interval(obj.get("confidence")),
        reasoning: text(obj.get("reasoning")),
        relevant_clauses: objects(obj.get("relevant_clauses"))
            .map(|c| RelevantClause {
                clause_id: text(c.get("clause_id")),
                clause_text: text(c.get("clause_text")),
                relevance_score: unit_interval(c.get("relevance_score")),
            })
            .collect(),
        entities_found: strings(obj.get("entities_found")),
        decision_factors: objects(obj.get("decision_factors"))
            .map(|f| DecisionFactor {
                factor: text(f.get("factor")),
                status: FactorStatus::parse_lenient(&text(f.get("status"))),
                explanation: text(f.get("explanation")),
            })
            .collect(),
        metadata: AnswerMetadata {
            query_type: metadata
                .and_then(|m| m.get("query_type"))
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| analysis.intent.as_str().to_string()),
            processing_time_ms: 0,
            sources_used: metadata
                .and_then(|m| m.get("sources_used"))
                .and_then(number)
                .filter(|n| *n >= 0.0)
                .map(|n| n as usize)
                .unwrap_or(0),
            error: None,
        },
    })
}

/// Scalars stringified, anything else empty
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Number or numeric string
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn unit_interval(value: Option<&Value>) -> f32 {
    value
        .and_then(number)
        .map(|n| n.clamp(0.0, 1.0) as f32)
        .unwrap_or(0.0)
}

fn strings(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|v| !v.is_null() && !v.is_array() && !v.is_object())
                .map(|v| text(Some(v)))
                .collect()
        })
        .unwrap_or_default()
}

fn objects(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QueryIntent;

    fn analysis() -> QueryAnalysis {
        QueryAnalysis {
            intent: QueryIntent::PeriodQuery,
            entities: vec!["period".to_string()],
            keywords: vec!["grace".to_string()],
        }
    }

    #[test]
    fn test_extract_from_code_fence() {
        let raw = "Here is the answer: ```json\n{\"answer\":\"Yes\",\"confidence\":0.9}\n```";
        assert_eq!(
            extract_json_object(raw),
            Some("{\"answer\":\"Yes\",\"confidence\":0.9}")
        );
    }

    #[test]
    fn test_extract_ignores_braces_in_strings() {
        let raw = r#"prefix {"answer":"use } and \" { carefully","n":{"x":1}} trailing }"#;
        assert_eq!(
            extract_json_object(raw),
            Some(r#"{"answer":"use } and \" { carefully","n":{"x":1}}"#)
        );
    }

    #[test]
    fn test_extract_first_object_only() {
        assert_eq!(extract_json_object(r#"{"a":1} {"b":2}"#), Some(r#"{"a":1}"#));
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{\"unclosed\": 1"), None);
    }

    #[test]
    fn test_parse_full_reply() {
        let raw = r#"```json
{
  "answer": "Yes, after 24 months.",
  "confidence": 0.9,
  "reasoning": "Clause 4.2 states it.",
  "relevant_clauses": [
    {"clause_id": "4.2", "clause_text": "Cataract is covered after 24 months.", "relevance_score": 0.95}
  ],
  "entities_found": ["cataract", "waiting period"],
  "decision_factors": [
    {"factor": "Waiting period served", "status": "met", "explanation": "24 months"},
    {"factor": "Pre-existing", "status": "Not-Met", "explanation": "n/a"}
  ],
  "metadata": {"query_type": "period_query", "processing_time_ms": 150, "sources_used": 3}
}
```"#;
        let answer = parse_structured_answer(raw, &analysis()).unwrap();

        assert_eq!(answer.answer, "Yes, after 24 months.");
        assert!((answer.confidence - 0.9).abs() < 1e-6);
        assert_eq!(answer.relevant_clauses.len(), 1);
        assert_eq!(answer.relevant_clauses[0].clause_id, "4.2");
        assert_eq!(answer.entities_found, vec!["cataract", "waiting period"]);
        assert_eq!(answer.decision_factors[0].status, FactorStatus::Met);
        assert_eq!(answer.decision_factors[1].status, FactorStatus::NotMet);
        assert_eq!(answer.metadata.query_type, "period_query");
        assert_eq!(answer.metadata.sources_used, 3);
        assert_eq!(answer.metadata.error, None);
    }

    #[test]
    fn test_missing_fields_default() {
        let answer = parse_structured_answer(r#"{"answer":"Yes"}"#, &analysis()).unwrap();

        assert_eq!(answer.answer, "Yes");
        assert_eq!(answer.confidence, 0.0);
        assert!(answer.relevant_clauses.is_empty());
        assert!(answer.entities_found.is_empty());
        assert!(answer.decision_factors.is_empty());
        assert_eq!(answer.metadata.query_type, "period_query");
        assert_eq!(answer.metadata.sources_used, 0);
    }

    #[test]
    fn test_type_drift_is_coerced() {
        let raw = r#"{
            "answer": 42,
            "confidence": "1.7",
            "entities_found": ["a", 3, null, {"x": 1}],
            "decision_factors": [{"factor": "f", "status": "maybe"}, "junk"],
            "relevant_clauses": "none"
        }"#;
        let answer = parse_structured_answer(raw, &analysis()).unwrap();

        assert_eq!(answer.answer, "42");
        assert_eq!(answer.confidence, 1.0);
        assert_eq!(answer.entities_found, vec!["a", "3"]);
        assert_eq!(answer.decision_factors.len(), 1);
        assert_eq!(answer.decision_factors[0].status, FactorStatus::Conditional);
        assert!(answer.relevant_clauses.is_empty());
    }

    #[test]
    fn test_negative_confidence_clamped() {
        let answer =
            parse_structured_answer(r#"{"answer":"x","confidence":-0.4}"#, &analysis()).unwrap();
        assert_eq!(answer.confidence, 0.0);
    }

    #[test]
    fn test_malformed_reply_is_error() {
        assert!(matches!(
            parse_structured_answer("I could not find that.", &analysis()),
            Err(Error::MalformedModelOutput(_))
        ));
        assert!(matches!(
            parse_structured_answer("{answer: Yes}", &analysis()),
            Err(Error::MalformedModelOutput(_))
        ));
    }
}
