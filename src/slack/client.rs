use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::AppError;

const SLACK_API_BASE_URL: &str = "https://slack.com/api";

/// Minimal Slack Web API client; the bot only ever posts messages.
#[derive(Clone)]
pub struct SlackClient {
    bot_token: String,
    client: Client,
}

#[derive(Deserialize)]
struct SlackApiResponse {
    ok: bool,
    error: Option<String>,
}

impl SlackClient {
    pub fn new(bot_token: String) -> Self {
        Self {
            bot_token,
            client: Client::new(),
        }
    }

    pub async fn post_message(&self, channel: &str, text: &str) -> Result<(), AppError> {
        let url = format!("{SLACK_API_BASE_URL}/chat.postMessage");
        let body = json!({
            "channel": channel,
            "text": text,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.bot_token)
            .json(&body)
            .send()
            .await
            .map_err(AppError::internal)?;

        if !res.status().is_success() {
            return Err(AppError::Internal(format!(
                "slack chat.postMessage failed: {}",
                res.status()
            )));
        }

        // Slack reports application errors inside a 200 response
        let payload: SlackApiResponse = res.json().await.map_err(AppError::internal)?;
        if !payload.ok {
            return Err(AppError::Internal(format!(
                "slack chat.postMessage failed: {}",
                payload.error.unwrap_or_else(|| "unknown error".to_string())
            )));
        }

        Ok(())
    }
}
