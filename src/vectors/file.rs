use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::store::{VectorMap, VectorStore};
use crate::core::errors::AppError;

/// Local-file vector store for offline development and tests. Same
/// serialized shape as the GCS blob.
#[derive(Clone)]
pub struct FileVectorStore {
    path: PathBuf,
}

impl FileVectorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl VectorStore for FileVectorStore {
    async fn load(&self) -> Result<VectorMap, AppError> {
        let bytes = fs::read(&self.path).await.map_err(|e| {
            AppError::Storage(format!("reading {}: {e}", self.path.display()))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Storage(format!(
                "{} is not a valid vector mapping: {e}",
                self.path.display()
            ))
        })
    }

    async fn save(&self, vectors: &VectorMap) -> Result<(), AppError> {
        let payload = serde_json::to_vec(vectors).map_err(AppError::internal)?;
        fs::write(&self.path, payload).await.map_err(|e| {
            AppError::Storage(format!("writing {}: {e}", self.path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectors::store::VectorRecord;

    fn record(vector: Vec<f32>, content: &str) -> VectorRecord {
        VectorRecord {
            vector,
            content: Some(content.to_string()),
            source_url: None,
        }
    }

    #[tokio::test]
    async fn save_then_load_round_trips_ids_and_vector_bits() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileVectorStore::new(dir.path().join("document_vectors.json"));

        let mut vectors = VectorMap::new();
        vectors.insert(
            "guide".to_string(),
            record(vec![0.1, -0.25, 1.5e-7, f32::MIN_POSITIVE], "guide text"),
        );
        vectors.insert("faq".to_string(), record(vec![1.0, 0.0, -1.0, 0.5], "faq text"));

        store.save(&vectors).await.expect("save");
        let loaded = store.load().await.expect("load");

        assert_eq!(
            loaded.keys().collect::<Vec<_>>(),
            vectors.keys().collect::<Vec<_>>()
        );
        for (id, original) in &vectors {
            let bits: Vec<u32> = original.vector.iter().map(|v| v.to_bits()).collect();
            let loaded_bits: Vec<u32> =
                loaded[id].vector.iter().map(|v| v.to_bits()).collect();
            assert_eq!(bits, loaded_bits, "vector for {id} must survive bit-for-bit");
            assert_eq!(loaded[id].content, original.content);
        }
    }

    #[tokio::test]
    async fn save_overwrites_previous_mapping() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileVectorStore::new(dir.path().join("document_vectors.json"));

        let mut first = VectorMap::new();
        first.insert("old".to_string(), record(vec![1.0], "old"));
        store.save(&first).await.expect("save");

        let mut second = VectorMap::new();
        second.insert("new".to_string(), record(vec![2.0], "new"));
        store.save(&second).await.expect("save");

        let loaded = store.load().await.expect("load");
        assert!(loaded.contains_key("new"));
        assert!(!loaded.contains_key("old"));
    }

    #[tokio::test]
    async fn missing_file_is_a_storage_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileVectorStore::new(dir.path().join("nope.json"));
        let err = store.load().await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
