//! Abstract interface for document-vector persistence.
//!
//! The persisted form is a single serialized mapping of document id to
//! embedding (plus grounding material), written by full overwrite. The
//! primary implementation is `GcsVectorStore`; `FileVectorStore` serves
//! tests and offline use.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;
use crate::retrieval::IndexEntry;

/// Persisted form of one document: its embedding plus the grounding
/// material answers are built from. `content` is optional because early
/// corpus snapshots persisted vectors only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorRecord {
    pub vector: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// The whole persisted corpus. A BTreeMap so iteration (and therefore index
/// insertion order and tie-breaking) is id-lexicographic and stable across
/// process restarts.
pub type VectorMap = BTreeMap<String, VectorRecord>;

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Fetch and deserialize the whole mapping.
    async fn load(&self) -> Result<VectorMap, AppError>;

    /// Serialize and upload the whole mapping, replacing what was there.
    async fn save(&self, vectors: &VectorMap) -> Result<(), AppError>;
}

/// Converts the persisted mapping into index entries, in map order.
pub fn to_index_entries(vectors: VectorMap) -> Vec<IndexEntry> {
    vectors
        .into_iter()
        .map(|(id, record)| IndexEntry {
            id,
            vector: record.vector,
            content: record.content,
            source_url: record.source_url,
        })
        .collect()
}
