use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::provider::LanguageModel;
use super::types::ChatMessage;
use crate::core::config::OpenAiSettings;
use crate::core::errors::AppError;

/// OpenAI-compatible HTTP provider. Any service exposing `/v1/embeddings`
/// and `/v1/chat/completions` works through `base_url`.
#[derive(Clone)]
pub struct OpenAiProvider {
    settings: OpenAiSettings,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(settings: OpenAiSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(AppError::internal)?;
        Ok(Self { settings, client })
    }
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl LanguageModel for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::BadRequest(
                "cannot embed an empty text".to_string(),
            ));
        }

        let url = format!("{}/v1/embeddings", self.settings.base_url);
        let body = json!({
            "model": self.settings.embedding_model,
            "input": text,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::EmbeddingService(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::EmbeddingService(format!("{status}: {text}")));
        }

        let payload: EmbeddingsResponse = res
            .json()
            .await
            .map_err(|e| AppError::EmbeddingService(e.to_string()))?;

        let vector = payload
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .ok_or_else(|| {
                AppError::EmbeddingService("response contained no embedding".to_string())
            })?;

        if vector.is_empty() {
            return Err(AppError::EmbeddingService(
                "response contained an empty embedding".to_string(),
            ));
        }

        Ok(vector)
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, AppError> {
        let url = format!("{}/v1/chat/completions", self.settings.base_url);
        let body = json!({
            "model": self.settings.chat_model,
            "messages": messages,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::CompletionService(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::CompletionService(format!("{status}: {text}")));
        }

        let payload: ChatCompletionResponse = res
            .json()
            .await
            .map_err(|e| AppError::CompletionService(e.to_string()))?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::CompletionService("response contained no completion".to_string())
            })
    }
}
