use async_trait::async_trait;

use crate::core::errors::AppError;

/// A document as listed by the source, before its content is fetched.
#[derive(Debug, Clone)]
pub struct DocumentRef {
    pub id: String,
    pub name: String,
}

/// A fully fetched document, ready to embed. Immutable once ingested;
/// re-ingestion replaces the whole corpus.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub content: String,
    pub source_url: Option<String>,
}

/// Boundary to the external document store holding the corpus.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// List the documents in the configured collection.
    async fn list(&self) -> Result<Vec<DocumentRef>, AppError>;

    /// Fetch one document's plain-text content.
    async fn fetch(&self, doc: &DocumentRef) -> Result<Document, AppError>;
}
