use thiserror::Error;

use crate::core::errors::{AppError, ConfigError};

/// Failures while bringing the process up. All of these are fatal; nothing
/// is served on a partially initialized state.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("language model initialization failed: {0}")]
    Llm(AppError),
    #[error("failed to load document vectors: {0}")]
    Vectors(AppError),
    #[error("failed to build retrieval index: {0}")]
    Index(AppError),
}
