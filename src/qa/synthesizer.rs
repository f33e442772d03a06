//! Grounded answer generation: a two-message prompt pairing the configured
//! system instruction with the question and its retrieved context.

use crate::core::errors::AppError;
use crate::llm::{ChatMessage, LanguageModel};

/// Builds the grounding prompt. Contexts are concatenated in ranking order,
/// most similar first; overlapping content is left as-is.
pub fn build_prompt(system_prompt: &str, question: &str, contexts: &[&str]) -> Vec<ChatMessage> {
    let context_block = contexts.join("\n\n");
    vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(format!(
            "Question: {question}\n\nContext:\n{context_block}"
        )),
    ]
}

/// Asks the completion service for an answer grounded in the supplied
/// context. No retry here; transport-level policy belongs to the provider.
pub async fn synthesize(
    llm: &dyn LanguageModel,
    system_prompt: &str,
    question: &str,
    contexts: &[&str],
) -> Result<String, AppError> {
    let messages = build_prompt(system_prompt, question, contexts);
    llm.chat(messages).await
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct CannedModel {
        reply: String,
    }

    #[async_trait]
    impl LanguageModel for CannedModel {
        fn name(&self) -> &str {
            "canned"
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>, AppError> {
            Ok(vec![0.0])
        }

        async fn chat(&self, _messages: Vec<ChatMessage>) -> Result<String, AppError> {
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn prompt_has_system_instruction_first_and_ranked_contexts() {
        let messages = build_prompt(
            "Answer using only the supplied context.",
            "What is the refund policy?",
            &["refund policy text", "shipping policy text"],
        );

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "Answer using only the supplied context.");
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("What is the refund policy?"));

        let refund = messages[1].content.find("refund policy text").expect("first context");
        let shipping = messages[1]
            .content
            .find("shipping policy text")
            .expect("second context");
        assert!(refund < shipping, "contexts must keep ranking order");
    }

    #[tokio::test]
    async fn canned_completion_surfaces_unmodified() {
        let model = CannedModel {
            reply: "The refund window is 30 days.".to_string(),
        };

        let answer = synthesize(&model, "system", "question", &["context"])
            .await
            .expect("answer");
        assert_eq!(answer, "The refund window is 30 days.");
    }
}
