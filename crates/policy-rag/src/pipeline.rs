//! Batch orchestration: chunk once, then analyze, retrieve and synthesize per question

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::analysis::QueryAnalyzer;
use crate::config::{PipelineConfig, RagConfig};
use crate::error::{Error, Result};
use crate::generation::AnswerSynthesizer;
use crate::ingestion::TextChunker;
use crate::providers::LlmProvider;
use crate::retrieval::Retriever;
use crate::types::{BatchResult, Chunk, StructuredAnswer};

/// Answers a batch of questions over one document
#[derive(Clone)]
pub struct QueryPipeline {
    chunker: TextChunker,
    analyzer: QueryAnalyzer,
    retriever: Retriever,
    synthesizer: AnswerSynthesizer,
    config: PipelineConfig,
}

impl QueryPipeline {
    pub fn new(
        chunker: TextChunker,
        retriever: Retriever,
        llm: Arc<dyn LlmProvider>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            chunker,
            analyzer: QueryAnalyzer::new(),
            retriever,
            synthesizer: AnswerSynthesizer::new(llm),
            config,
        }
    }

    /// Build a pipeline from service configuration
    pub fn from_config(config: &RagConfig, llm: Arc<dyn LlmProvider>) -> Self {
        Self::new(
            TextChunker::from_config(&config.chunking),
            Retriever::from_config(&config.retrieval),
            llm,
            config.pipeline.clone(),
        )
    }

    /// The generation backend in use
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        self.synthesizer.llm()
    }

    /// Answer every question against `document_text`
    ///
    /// Fails only on invalid input. A question that fails to process yields
    /// an error placeholder in its slot; results keep input order.
    pub async fn run(&self, document_text: &str, questions: &[String]) -> Result<BatchResult> {
        if questions.is_empty() {
            return Err(Error::invalid_input("questions must be a non-empty list"));
        }
        if document_text.trim().is_empty() {
            return Err(Error::invalid_input("document text is empty"));
        }

        let span = tracing::info_span!("batch", id = %Uuid::new_v4());
        self.run_validated(document_text, questions)
            .instrument(span)
            .await
    }

    async fn run_validated(&self, document_text: &str, questions: &[String]) -> Result<BatchResult> {
        let start = Instant::now();

        let chunks: Arc<[Chunk]> = self.chunker.chunk(document_text).into();
        tracing::info!(
            "Processing {} questions over {} chunks",
            questions.len(),
            chunks.len()
        );

        let concurrency = self.config.max_concurrent_questions.max(1);
        let pending: Vec<_> = questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let chunks = Arc::clone(&chunks);
                async move {
                    match self.answer_question(question, &chunks).await {
                        Ok(answer) => answer,
                        Err(e) => {
                            tracing::warn!("Question {} failed: {}", index + 1, e);
                            StructuredAnswer::error(e.to_string())
                        }
                    }
                }
                .instrument(tracing::info_span!("question", index = index + 1))
            })
            .collect();

        let answers: Vec<StructuredAnswer> = stream::iter(pending)
            .buffered(concurrency)
            .collect()
            .await;

        let result = BatchResult::new(
            answers,
            chunks.len(),
            start.elapsed().as_millis() as u64,
            self.config.system_version.clone(),
        );

        tracing::info!(
            "Batch complete in {}ms (avg confidence {:.2}, {} failed)",
            result.system_metadata.total_processing_time_ms,
            result.system_metadata.avg_confidence,
            result.error_count()
        );

        Ok(result)
    }

    async fn answer_question(&self, question: &str, chunks: &[Chunk]) -> Result<StructuredAnswer> {
        let analysis = self.analyzer.analyze(question);
        let ranked = self.retriever.retrieve(question, chunks);

        tracing::info!(
            "Intent {} with {} context chunks",
            analysis.intent,
            ranked.len()
        );

        self.synthesizer.synthesize(question, &ranked, &analysis).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    const POLICY: &str = "The grace period for premium payment is thirty days. \
        Cataract surgery has a waiting period of two years. \
        Maternity expenses are covered after nine months. \
        Room rent is limited to one percent of the sum insured.";

    /// Answers from the question line of the prompt; "outage" questions fail
    struct StubLlm;

    #[async_trait]
    impl LlmProvider for StubLlm {
        async fn generate(&self, prompt: &str) -> Result<String> {
            let query = prompt
                .lines()
                .find(|line| line.starts_with("Query:"))
                .unwrap_or_default();

            if query.contains("outage") {
                return Err(Error::model_unavailable("HTTP 500"));
            }
            if query.contains("Cataract") {
                // finish after later questions when run concurrently
                tokio::time::sleep(Duration::from_millis(50)).await;
                return Ok(r#"{"answer":"Two years","confidence":0.8}"#.to_string());
            }
            if query.contains("Maternity") {
                return Ok("not json at all".to_string());
            }
            Ok(r#"{"answer":"Thirty days","confidence":0.9}"#.to_string())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    fn pipeline(max_concurrent_questions: usize) -> QueryPipeline {
        QueryPipeline::new(
            TextChunker::new(80, 1),
            Retriever::new(2),
            Arc::new(StubLlm),
            PipelineConfig {
                max_concurrent_questions,
                ..Default::default()
            },
        )
    }

    fn questions(qs: &[&str]) -> Vec<String> {
        qs.iter().map(|q| q.to_string()).collect()
    }

    #[tokio::test]
    async fn test_failed_question_is_isolated() {
        let result = pipeline(1)
            .run(
                POLICY,
                &questions(&["What is the grace period?", "Is there an outage?"]),
            )
            .await
            .unwrap();

        assert_eq!(result.structured_responses.len(), 2);
        assert_eq!(result.answers.len(), 2);
        assert_eq!(result.answers[0], "Thirty days");

        let failed = &result.structured_responses[1];
        assert_eq!(failed.confidence, 0.0);
        assert_eq!(failed.metadata.query_type, "error");
        assert!(failed.answer.starts_with("Failed to process this question: "));
        assert_eq!(failed.metadata.sources_used, 0);
        assert!(failed.metadata.error.is_some());

        assert!((result.system_metadata.avg_confidence - 0.45).abs() < 1e-6);
        assert_eq!(result.system_metadata.questions_processed, 2);
        assert_eq!(result.system_metadata.system_version, "HackRx-RAG-v1.0");
        assert_eq!(result.error_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_reply_degrades() {
        let result = pipeline(1)
            .run(POLICY, &questions(&["Maternity waiting period?"]))
            .await
            .unwrap();

        let answer = &result.structured_responses[0];
        assert_eq!(answer.answer, "not json at all");
        assert!((answer.confidence - 0.7).abs() < 1e-6);
        assert_eq!(answer.metadata.sources_used, 2);
    }

    #[tokio::test]
    async fn test_concurrent_run_keeps_input_order() {
        let qs = questions(&[
            "Cataract surgery waiting period?",
            "What is the grace period?",
            "Is there an outage?",
        ]);
        let result = pipeline(3).run(POLICY, &qs).await.unwrap();

        assert_eq!(result.answers[0], "Two years");
        assert_eq!(result.answers[1], "Thirty days");
        assert!(result.structured_responses[2].is_error());
    }

    #[tokio::test]
    async fn test_chunk_count_reported() {
        let pipeline = pipeline(1);
        let expected = TextChunker::new(80, 1).chunk(POLICY).len();

        let result = pipeline
            .run(POLICY, &questions(&["grace period?"]))
            .await
            .unwrap();
        assert_eq!(result.system_metadata.document_chunks_created, expected);
    }

    #[tokio::test]
    async fn test_run_on_spawned_task() {
        let pipeline = pipeline(2);
        let handle = tokio::spawn(async move {
            let qs = questions(&["What is the grace period?", "Cataract waiting period?"]);
            pipeline.run(POLICY, &qs).await
        });

        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.answers, vec!["Thirty days", "Two years"]);
    }

    #[tokio::test]
    async fn test_empty_questions_rejected() {
        let err = pipeline(1).run(POLICY, &[]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_blank_document_rejected() {
        let err = pipeline(1)
            .run("   \n ", &questions(&["anything?"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
