//! Offline ingestion pass: list the corpus, fetch and embed each document,
//! persist the full mapping by overwrite.
//!
//! A single bad document must not sink the batch: per-document failures are
//! logged, recorded in the report, and skipped. A batch that produces no
//! usable documents at all is an error, because the resulting index could
//! never serve a query.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::source::{DocumentRef, DocumentSource};
use crate::core::errors::AppError;
use crate::llm::LanguageModel;
use crate::vectors::{VectorMap, VectorRecord, VectorStore};

#[derive(Debug, Clone, Serialize)]
pub struct IngestFailure {
    pub id: String,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<IngestFailure>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct IngestOutcome {
    pub vectors: VectorMap,
    pub report: IngestReport,
}

pub async fn run(
    source: &dyn DocumentSource,
    llm: &dyn LanguageModel,
    store: &dyn VectorStore,
) -> Result<IngestOutcome, AppError> {
    let refs = source.list().await?;
    tracing::info!("Found {} documents to ingest", refs.len());

    let mut vectors = VectorMap::new();
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();

    for (index, doc_ref) in refs.iter().enumerate() {
        tracing::info!("Processing ({}/{}): {}", index + 1, refs.len(), doc_ref.name);
        match ingest_one(source, llm, doc_ref).await {
            Ok(record) => {
                vectors.insert(doc_ref.name.clone(), record);
                succeeded.push(doc_ref.name.clone());
            }
            Err(err) => {
                tracing::warn!("Skipping {}: {}", doc_ref.name, err);
                failed.push(IngestFailure {
                    id: doc_ref.id.clone(),
                    name: doc_ref.name.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    if vectors.is_empty() {
        return Err(AppError::DocumentSource(format!(
            "ingestion produced no usable documents ({} listed, {} failed)",
            refs.len(),
            failed.len()
        )));
    }

    store.save(&vectors).await?;
    tracing::info!(
        "Ingestion complete: {} documents vectorized, {} failed",
        succeeded.len(),
        failed.len()
    );

    Ok(IngestOutcome {
        vectors,
        report: IngestReport {
            succeeded,
            failed,
            completed_at: Utc::now(),
        },
    })
}

async fn ingest_one(
    source: &dyn DocumentSource,
    llm: &dyn LanguageModel,
    doc_ref: &DocumentRef,
) -> Result<VectorRecord, AppError> {
    let document = source.fetch(doc_ref).await?;
    let vector = llm.embed(&document.content).await?;
    tracing::debug!(
        "Embedded {} ({} chars, {} dimensions)",
        document.name,
        document.content.chars().count(),
        vector.len()
    );

    Ok(VectorRecord {
        vector,
        content: Some(document.content),
        source_url: document.source_url,
    })
}
