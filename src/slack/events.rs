//! Slack Events API front end. One route receives everything: the
//! `url_verification` handshake and `app_mention` events. Slack expects an
//! ack within seconds, so the answer pipeline runs in a spawned task and
//! replies via `chat.postMessage`.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::errors::AppError;
use crate::qa::Answer;
use crate::state::AppState;

/// Fixed refusal for mentions from channels outside the allow-list.
pub const REFUSAL_MESSAGE: &str = "This bot cannot be used in this channel.";

/// Fixed reply when the answer pipeline fails; the turn must produce a
/// visible response, never a stale or default answer.
pub const FAILURE_MESSAGE: &str = "Sorry, I could not process that question.";

#[derive(Debug, Deserialize)]
pub struct SlackEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub challenge: Option<String>,
    pub event: Option<SlackEvent>,
}

#[derive(Debug, Deserialize)]
pub struct SlackEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub channel: Option<String>,
    pub text: Option<String>,
}

pub async fn slack_events(
    State(state): State<Arc<AppState>>,
    Json(envelope): Json<SlackEnvelope>,
) -> Result<Json<Value>, AppError> {
    match envelope.kind.as_str() {
        "url_verification" => {
            let challenge = envelope.challenge.unwrap_or_default();
            Ok(Json(json!({ "challenge": challenge })))
        }
        "event_callback" => {
            if let Some(event) = envelope.event {
                if event.kind == "app_mention" {
                    handle_mention(state, event);
                }
            }
            Ok(Json(json!({ "ok": true })))
        }
        _ => Ok(Json(json!({ "ok": true }))),
    }
}

fn handle_mention(state: Arc<AppState>, event: SlackEvent) {
    let Some(channel) = event.channel else {
        return;
    };
    let text = event.text.unwrap_or_default();

    tokio::spawn(async move {
        let Some(slack) = state.slack.clone() else {
            tracing::warn!("Received a Slack mention but no Slack client is configured");
            return;
        };

        let allowed = state
            .settings
            .slack
            .as_ref()
            .map(|s| s.allowed_channels.as_slice())
            .unwrap_or_default();
        if !channel_allowed(allowed, &channel) {
            if let Err(err) = slack.post_message(&channel, REFUSAL_MESSAGE).await {
                tracing::error!("Failed to post refusal to {}: {}", channel, err);
            }
            return;
        }

        let reply = match state.engine.ask(&text, None).await {
            Ok(answer) => format_answer(&answer),
            Err(err) => {
                tracing::error!("Answering mention in {} failed: {}", channel, err);
                FAILURE_MESSAGE.to_string()
            }
        };

        if let Err(err) = slack.post_message(&channel, &reply).await {
            tracing::error!("Failed to post answer to {}: {}", channel, err);
        }
    });
}

/// An empty allow-list means no restriction.
pub fn channel_allowed(allowed: &[String], channel: &str) -> bool {
    allowed.is_empty() || allowed.iter().any(|entry| entry == channel)
}

/// Renders the answer with a citation footer when sources carry URLs.
pub fn format_answer(answer: &Answer) -> String {
    let links: Vec<String> = answer
        .sources
        .iter()
        .filter_map(|source| {
            source
                .url
                .as_ref()
                .map(|url| format!("<{}|{}>", url, source.id))
        })
        .collect();

    if links.is_empty() {
        return answer.text.clone();
    }
    format!("{}\n\nSources: {}", answer.text, links.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qa::SourceRef;

    #[test]
    fn url_verification_envelope_parses() {
        let envelope: SlackEnvelope = serde_json::from_str(
            r#"{"type": "url_verification", "challenge": "abc123"}"#,
        )
        .expect("envelope");
        assert_eq!(envelope.kind, "url_verification");
        assert_eq!(envelope.challenge.as_deref(), Some("abc123"));
    }

    #[test]
    fn app_mention_envelope_parses() {
        let envelope: SlackEnvelope = serde_json::from_str(
            r#"{"type": "event_callback", "event": {"type": "app_mention", "channel": "C123", "text": "<@U1> hello"}}"#,
        )
        .expect("envelope");
        let event = envelope.event.expect("event");
        assert_eq!(event.kind, "app_mention");
        assert_eq!(event.channel.as_deref(), Some("C123"));
    }

    #[test]
    fn disallowed_channel_is_refused() {
        let allowed = vec!["C111".to_string(), "C222".to_string()];
        assert!(channel_allowed(&allowed, "C111"));
        assert!(!channel_allowed(&allowed, "C999"));
    }

    #[test]
    fn empty_allow_list_permits_every_channel() {
        assert!(channel_allowed(&[], "C999"));
    }

    #[test]
    fn answer_with_sources_gets_a_citation_footer() {
        let answer = Answer {
            text: "The refund window is 30 days.".to_string(),
            sources: vec![
                SourceRef {
                    id: "refund-policy".to_string(),
                    url: Some("https://docs.google.com/document/d/abc/edit".to_string()),
                    score: 0.92,
                },
                SourceRef {
                    id: "legacy".to_string(),
                    url: None,
                    score: 0.4,
                },
            ],
        };

        let rendered = format_answer(&answer);
        assert!(rendered.starts_with("The refund window is 30 days."));
        assert!(rendered.contains("refund-policy"));
        assert!(!rendered.contains("legacy"), "sources without URLs are not cited");
    }

    #[test]
    fn answer_without_sources_is_plain_text() {
        let answer = Answer {
            text: "No idea.".to_string(),
            sources: vec![],
        };
        assert_eq!(format_answer(&answer), "No idea.");
    }
}
