//! In-memory retrieval index over document embeddings.
//!
//! A linear cosine-similarity scan over every stored vector, which is all
//! the corpus sizes this system targets need. The query operations are the
//! contract; the scan itself stays private so a smarter structure could
//! replace it without touching callers.

use crate::core::errors::AppError;
use crate::vector_math::rank_descending_by_cosine;

/// One indexed document: identifier, embedding, and whatever grounding
/// material was persisted alongside it.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub id: String,
    pub vector: Vec<f32>,
    pub content: Option<String>,
    pub source_url: Option<String>,
}

impl AsRef<[f32]> for IndexEntry {
    fn as_ref(&self) -> &[f32] {
        &self.vector
    }
}

/// A ranked query hit. Borrows the entry so large document contents are not
/// copied per query.
#[derive(Debug)]
pub struct ScoredMatch<'a> {
    pub entry: &'a IndexEntry,
    pub score: f32,
}

/// Read-only mapping from document id to embedding, queried by cosine
/// similarity. Built once, never mutated; rebuilds swap in a whole new
/// instance.
#[derive(Debug, Default)]
pub struct RetrievalIndex {
    entries: Vec<IndexEntry>,
}

impl RetrievalIndex {
    /// Builds an index from entries in the given order. Insertion order is
    /// observable: equal similarity scores rank earlier entries first.
    ///
    /// All vectors must share one dimensionality; an index mixing embedding
    /// models would produce garbage scores and is rejected outright.
    pub fn build(entries: Vec<IndexEntry>) -> Result<Self, AppError> {
        if let Some(first) = entries.first() {
            let expected = first.vector.len();
            for entry in &entries {
                if entry.vector.len() != expected {
                    return Err(AppError::DimensionMismatch {
                        expected,
                        actual: entry.vector.len(),
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimensionality of the stored vectors; `None` for an empty index.
    pub fn dimension(&self) -> Option<usize> {
        self.entries.first().map(|entry| entry.vector.len())
    }

    /// Returns the single best-scoring document for the query vector.
    pub fn find_most_similar(&self, query: &[f32]) -> Result<ScoredMatch<'_>, AppError> {
        let mut matches = self.find_top_k(query, 1)?;
        // find_top_k on a non-empty index always yields at least one match
        matches
            .pop()
            .ok_or_else(|| AppError::internal("ranking produced no matches"))
    }

    /// Returns the `k` best-scoring documents, most similar first. An index
    /// with fewer than `k` documents returns all of them.
    pub fn find_top_k(&self, query: &[f32], k: usize) -> Result<Vec<ScoredMatch<'_>>, AppError> {
        if k == 0 {
            return Err(AppError::BadRequest("top_k must be at least 1".to_string()));
        }
        if self.entries.is_empty() {
            return Err(AppError::EmptyIndex);
        }
        if let Some(expected) = self.dimension() {
            if query.len() != expected {
                return Err(AppError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }

        let ranked = rank_descending_by_cosine(query, &self.entries)?;
        Ok(ranked
            .into_iter()
            .take(k)
            .map(|(idx, score)| ScoredMatch {
                entry: &self.entries[idx],
                score,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, vector: Vec<f32>) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            vector,
            content: Some(format!("content of {id}")),
            source_url: None,
        }
    }

    fn sample_index() -> RetrievalIndex {
        RetrievalIndex::build(vec![
            entry("alpha", vec![1.0, 0.0, 0.0]),
            entry("beta", vec![0.0, 1.0, 0.0]),
            entry("gamma", vec![0.7, 0.7, 0.0]),
        ])
        .expect("consistent dimensions")
    }

    #[test]
    fn exact_duplicate_of_query_wins() {
        let index = sample_index();
        let best = index.find_most_similar(&[0.0, 1.0, 0.0]).expect("match");
        assert_eq!(best.entry.id, "beta");
        assert!((best.score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn top_k_is_sorted_descending_without_duplicates() {
        let index = sample_index();
        let matches = index.find_top_k(&[1.0, 0.1, 0.0], 3).expect("matches");

        assert_eq!(matches.len(), 3);
        assert!(matches[0].score >= matches[1].score);
        assert!(matches[1].score >= matches[2].score);

        let mut ids: Vec<&str> = matches.iter().map(|m| m.entry.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn top_k_larger_than_index_returns_everything() {
        let index = sample_index();
        let matches = index.find_top_k(&[1.0, 0.0, 0.0], 10).expect("matches");
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn duplicate_documents_tie_break_to_insertion_order() {
        let index = RetrievalIndex::build(vec![
            entry("cat-a", vec![1.0, 0.0]),
            entry("dog", vec![0.0, 1.0]),
            entry("cat-c", vec![1.0, 0.0]),
        ])
        .expect("consistent dimensions");

        let best = index.find_most_similar(&[1.0, 0.0]).expect("match");
        assert_eq!(best.entry.id, "cat-a");
    }

    #[test]
    fn empty_index_is_an_explicit_error() {
        let index = RetrievalIndex::default();
        let err = index.find_top_k(&[1.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, AppError::EmptyIndex));
    }

    #[test]
    fn query_dimension_mismatch_is_rejected() {
        let index = sample_index();
        let err = index.find_most_similar(&[1.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            AppError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn mixed_dimension_entries_are_rejected_at_build() {
        let err = RetrievalIndex::build(vec![
            entry("alpha", vec![1.0, 0.0]),
            entry("beta", vec![1.0, 0.0, 0.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, AppError::DimensionMismatch { .. }));
    }

    #[test]
    fn zero_k_is_a_bad_request() {
        let index = sample_index();
        let err = index.find_top_k(&[1.0, 0.0, 0.0], 0).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
