use serde::Deserialize;

/// One frame from the web chat client. Only `type: "message"` does anything;
/// unknown types are ignored so older clients stay harmless.
#[derive(Debug, Deserialize, Default)]
pub struct WsIncomingMessage {
    #[serde(rename = "type")]
    pub msg_type: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "topK")]
    pub top_k: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_parses_with_optional_top_k() {
        let incoming: WsIncomingMessage =
            serde_json::from_str(r#"{"type": "message", "message": "hi", "topK": 2}"#)
                .expect("frame");
        assert_eq!(incoming.msg_type.as_deref(), Some("message"));
        assert_eq!(incoming.message.as_deref(), Some("hi"));
        assert_eq!(incoming.top_k, Some(2));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let incoming: WsIncomingMessage =
            serde_json::from_str(r#"{"type": "message", "message": "hi", "mode": "chat"}"#)
                .expect("frame");
        assert_eq!(incoming.top_k, None);
    }
}
