use std::cmp::Ordering;

use crate::core::errors::AppError;

/// Cosine similarity between two vectors of equal dimensionality.
///
/// A zero-magnitude operand yields 0.0 rather than NaN so that similarity
/// rankings stay total and deterministic. Mismatched lengths are a caller
/// error and are rejected before any arithmetic happens.
pub fn cosine_similarity(query: &[f32], candidate: &[f32]) -> Result<f32, AppError> {
    if query.len() != candidate.len() {
        return Err(AppError::DimensionMismatch {
            expected: query.len(),
            actual: candidate.len(),
        });
    }
    if query.is_empty() {
        return Err(AppError::BadRequest("vectors must not be empty".to_string()));
    }

    let mut dot = 0.0f64;
    let mut query_sq = 0.0f64;
    let mut candidate_sq = 0.0f64;
    for (a, b) in query.iter().zip(candidate.iter()) {
        dot += f64::from(*a) * f64::from(*b);
        query_sq += f64::from(*a) * f64::from(*a);
        candidate_sq += f64::from(*b) * f64::from(*b);
    }

    let denom = query_sq.sqrt() * candidate_sq.sqrt();
    if denom <= f64::EPSILON {
        return Ok(0.0);
    }

    Ok((dot / denom).clamp(-1.0, 1.0) as f32)
}

/// Scores every candidate against the query and sorts descending by
/// similarity. Equal scores keep their original relative order, so callers
/// get a deterministic ranking.
pub fn rank_descending_by_cosine<C: AsRef<[f32]>>(
    query: &[f32],
    candidates: &[C],
) -> Result<Vec<(usize, f32)>, AppError> {
    let mut scores = Vec::with_capacity(candidates.len());
    for (idx, candidate) in candidates.iter().enumerate() {
        let score = cosine_similarity(query, candidate.as_ref())?;
        scores.push((idx, score));
    }

    scores.sort_by(|left, right| right.1.partial_cmp(&left.1).unwrap_or(Ordering::Equal));
    Ok(scores)
}
