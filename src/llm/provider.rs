use async_trait::async_trait;

use super::types::ChatMessage;
use crate::core::errors::AppError;

/// Boundary to the external language-model service. The two operations the
/// core needs: turn text into a vector, turn a prompt into a completion.
/// Model identifiers come from configuration, not from callers.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// return the provider name (e.g. "openai")
    fn name(&self) -> &str;

    /// embed a single text into a fixed-dimension vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError>;

    /// chat completion (non-streaming)
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, AppError>;
}
