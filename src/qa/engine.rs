//! The retrieval-and-answer pipeline shared by every front end:
//! embed the question, scan the index, synthesize a grounded answer.

use std::sync::{Arc, RwLock};

use serde::Serialize;

use super::synthesizer;
use crate::core::config::Settings;
use crate::core::errors::AppError;
use crate::llm::LanguageModel;
use crate::retrieval::RetrievalIndex;

/// Citation for one matched document, in ranking order.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<SourceRef>,
}

pub struct QaEngine {
    llm: Arc<dyn LanguageModel>,
    // Swapped wholesale on re-ingestion; readers clone the Arc and never
    // observe a partial rebuild.
    index: RwLock<Arc<RetrievalIndex>>,
    system_prompt: String,
    default_top_k: usize,
}

impl QaEngine {
    pub fn new(llm: Arc<dyn LanguageModel>, index: RetrievalIndex, settings: &Settings) -> Self {
        Self {
            llm,
            index: RwLock::new(Arc::new(index)),
            system_prompt: settings.system_prompt.clone(),
            default_top_k: settings.retrieval.top_k,
        }
    }

    /// Snapshot of the currently served index.
    pub fn index(&self) -> Arc<RetrievalIndex> {
        self.index
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replaces the served index atomically.
    pub fn swap_index(&self, index: RetrievalIndex) {
        let mut guard = self
            .index
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(index);
    }

    /// Runs one question through the full pipeline. `top_k` overrides the
    /// configured default for this request only.
    pub async fn ask(&self, question: &str, top_k: Option<usize>) -> Result<Answer, AppError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::BadRequest("question must not be empty".to_string()));
        }

        let index = self.index();
        if index.is_empty() {
            return Err(AppError::EmptyIndex);
        }

        let query_vector = self.llm.embed(question).await?;
        let matches = index.find_top_k(&query_vector, top_k.unwrap_or(self.default_top_k))?;

        let mut contexts = Vec::with_capacity(matches.len());
        for matched in &matches {
            match matched.entry.content.as_deref() {
                Some(content) => contexts.push(content),
                // Legacy corpus snapshots persisted vectors without content.
                None => tracing::warn!(
                    "Document {} has no stored content; answering without it",
                    matched.entry.id
                ),
            }
        }

        let text =
            synthesizer::synthesize(self.llm.as_ref(), &self.system_prompt, question, &contexts)
                .await?;

        let sources = matches
            .iter()
            .map(|matched| SourceRef {
                id: matched.entry.id.clone(),
                url: matched.entry.source_url.clone(),
                score: matched.score,
            })
            .collect();

        Ok(Answer { text, sources })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::core::config::settings::{RawSettings, Settings};
    use crate::llm::ChatMessage;
    use crate::retrieval::IndexEntry;

    const CONFIG: &str = r#"
openai:
  api_key: sk-test
  embedding_model: test-embed
  chat_model: test-chat
gcs:
  bucket_name: bucket
  document_vectors_file: vectors.json
system_prompt: "Answer using only the supplied context."
retrieval:
  top_k: 2
"#;

    fn settings() -> Settings {
        let raw: RawSettings = serde_yaml::from_str(CONFIG).expect("yaml");
        Settings::from_raw(raw).expect("valid config")
    }

    /// Embeds a few known words onto fixed axes and answers with a canned
    /// string that echoes the prompt, so tests can see what reached the
    /// completion call.
    struct ScriptedModel;

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
            let vector = match text {
                t if t.contains("cat") => vec![1.0, 0.0],
                t if t.contains("dog") => vec![0.0, 1.0],
                _ => vec![0.5, 0.5],
            };
            Ok(vector)
        }

        async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, AppError> {
            Ok(format!("answer:{}", messages[1].content))
        }
    }

    struct WrongDimensionModel;

    #[async_trait]
    impl LanguageModel for WrongDimensionModel {
        fn name(&self) -> &str {
            "wrong-dimension"
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, AppError> {
            Ok(vec![1.0, 0.0, 0.0])
        }

        async fn chat(&self, _messages: Vec<ChatMessage>) -> Result<String, AppError> {
            Ok(String::new())
        }
    }

    fn entry(id: &str, vector: Vec<f32>, content: &str) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            vector,
            content: Some(content.to_string()),
            source_url: None,
        }
    }

    fn sample_index() -> RetrievalIndex {
        RetrievalIndex::build(vec![
            entry("cats", vec![1.0, 0.0], "all about cats"),
            entry("dogs", vec![0.0, 1.0], "all about dogs"),
        ])
        .expect("index")
    }

    #[test]
    fn swap_index_replaces_the_served_snapshot() {
        let engine = QaEngine::new(Arc::new(ScriptedModel), sample_index(), &settings());
        assert_eq!(engine.index().len(), 2);

        engine.swap_index(
            RetrievalIndex::build(vec![entry("solo", vec![1.0, 0.0], "only doc")]).expect("index"),
        );
        assert_eq!(engine.index().len(), 1);
    }

    #[tokio::test]
    async fn ask_grounds_on_the_best_matching_document() {
        let engine = QaEngine::new(Arc::new(ScriptedModel), sample_index(), &settings());

        let answer = engine.ask("tell me about cat care", None).await.expect("answer");

        assert!(answer.text.contains("all about cats"));
        assert_eq!(answer.sources.len(), 2);
        assert_eq!(answer.sources[0].id, "cats");
        assert!(answer.sources[0].score >= answer.sources[1].score);
    }

    #[tokio::test]
    async fn top_k_override_narrows_the_context() {
        let engine = QaEngine::new(Arc::new(ScriptedModel), sample_index(), &settings());

        let answer = engine
            .ask("tell me about dog food", Some(1))
            .await
            .expect("answer");

        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].id, "dogs");
        assert!(!answer.text.contains("all about cats"));
    }

    #[tokio::test]
    async fn empty_question_is_rejected_before_any_service_call() {
        let engine = QaEngine::new(Arc::new(ScriptedModel), sample_index(), &settings());
        let err = engine.ask("   ", None).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn empty_index_is_reported_distinctly() {
        let engine = QaEngine::new(Arc::new(ScriptedModel), RetrievalIndex::default(), &settings());
        let err = engine.ask("anything", None).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyIndex));
    }

    #[tokio::test]
    async fn embedding_model_drift_is_caught_as_dimension_mismatch() {
        let engine = QaEngine::new(Arc::new(WrongDimensionModel), sample_index(), &settings());
        let err = engine.ask("anything", None).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }
}
