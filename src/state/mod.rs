use std::sync::Arc;

use crate::core::config::Settings;
use crate::core::errors::AppError;
use crate::ingest::pipeline;
use crate::ingest::{DocumentSource, GoogleDriveSource, IngestReport};
use crate::llm::{LanguageModel, OpenAiProvider};
use crate::qa::QaEngine;
use crate::retrieval::RetrievalIndex;
use crate::slack::SlackClient;
use crate::vectors::{to_index_entries, GcsVectorStore, VectorStore};

pub mod error;

use error::InitializationError;

/// Global application state shared across all routes and background tasks.
pub struct AppState {
    pub settings: Arc<Settings>,
    pub engine: Arc<QaEngine>,
    pub llm: Arc<dyn LanguageModel>,
    pub store: Arc<dyn VectorStore>,
    pub source: Option<Arc<dyn DocumentSource>>,
    pub slack: Option<SlackClient>,
}

impl AppState {
    /// Initializes the application state:
    /// 1. Builds the language-model provider from config
    /// 2. Loads the persisted document vectors from the blob store
    /// 3. Builds the retrieval index and the QA engine on top of it
    /// 4. Wires the optional Slack client and Drive source
    pub async fn initialize(settings: Settings) -> Result<Arc<Self>, InitializationError> {
        let settings = Arc::new(settings);

        let llm: Arc<dyn LanguageModel> = Arc::new(
            OpenAiProvider::new(settings.openai.clone()).map_err(InitializationError::Llm)?,
        );
        tracing::info!(
            "Using {} provider (embeddings: {}, chat: {})",
            llm.name(),
            settings.openai.embedding_model,
            settings.openai.chat_model
        );
        let store: Arc<dyn VectorStore> = Arc::new(GcsVectorStore::new(settings.gcs.clone()));

        let vectors = store.load().await.map_err(InitializationError::Vectors)?;
        let index = RetrievalIndex::build(to_index_entries(vectors))
            .map_err(InitializationError::Index)?;
        tracing::info!(
            "Loaded {} document vectors from gs://{}/{}",
            index.len(),
            settings.gcs.bucket_name,
            settings.gcs.document_vectors_file
        );

        let engine = Arc::new(QaEngine::new(llm.clone(), index, &settings));

        let source = settings
            .google_drive
            .clone()
            .map(|drive| Arc::new(GoogleDriveSource::new(drive)) as Arc<dyn DocumentSource>);

        let slack = settings
            .slack
            .clone()
            .map(|slack| SlackClient::new(slack.bot_token));

        Ok(Arc::new(AppState {
            settings,
            engine,
            llm,
            store,
            source,
            slack,
        }))
    }

    /// Re-ingests the corpus and atomically swaps the served index. The
    /// report says which documents made it and which did not.
    pub async fn reindex(&self) -> Result<IngestReport, AppError> {
        let source = self.source.as_ref().ok_or_else(|| {
            AppError::BadRequest(
                "google_drive.folder_id must be configured to reindex".to_string(),
            )
        })?;

        let outcome =
            pipeline::run(source.as_ref(), self.llm.as_ref(), self.store.as_ref()).await?;
        let index = RetrievalIndex::build(to_index_entries(outcome.vectors))?;
        self.engine.swap_index(index);

        Ok(outcome.report)
    }
}
