//! Support chat: one user message in, one short supportive reply out.
//!
//! Replies come from a hosted text-generation model when an API key is
//! configured, or from a keyword matcher that works offline.

mod gemini;
mod keyword;

pub use gemini::GeminiClient;
pub use keyword::KeywordResponder;

use indoc::indoc;

use crate::error::ChatError;
use crate::storage::{ChatConfig, ChatProvider};

pub const SYSTEM_PROMPT: &str = indoc! {"
    You are SukoonAI, a compassionate mental health assistant designed to provide emotional support, guidance, and resources to users.

    Guidelines:
    1. Keep responses brief and focused (2-3 sentences)
    2. Be warm, empathetic, and conversational
    3. Use simple, clear language
    4. Ask follow-up questions to better understand the user
    5. Avoid clinical jargon unless specifically asked
    6. Suggest practical coping strategies when appropriate
    7. Recognize signs of crisis and suggest professional help
    8. Never diagnose conditions or provide medical advice
    9. Respect cultural differences
    10. Keep responses under 50 words when possible

    IMPORTANT: If the user expresses thoughts of self-harm or suicide, immediately direct them to emergency services (911/999), crisis lines (988 Suicide & Crisis Lifeline), or suggest speaking to a mental health professional.

    Remember: You are a supportive companion, not a replacement for professional care."};

/// Acknowledgement placed as the model's turn after the system prompt.
pub const MODEL_ACKNOWLEDGEMENT: &str =
    "I understand. I will follow these guidelines and provide supportive, brief responses.";

/// Anything that can answer a single chat message.
#[allow(async_fn_in_trait)]
pub trait Responder {
    async fn reply(&self, message: &str) -> Result<String, ChatError>;
}

/// The responder selected from configuration.
#[derive(Debug)]
pub enum Assistant {
    Gemini(GeminiClient),
    Offline(KeywordResponder),
}

impl Assistant {
    pub fn is_offline(&self) -> bool {
        matches!(self, Assistant::Offline(_))
    }
}

impl Responder for Assistant {
    async fn reply(&self, message: &str) -> Result<String, ChatError> {
        match self {
            Assistant::Gemini(client) => client.reply(message).await,
            Assistant::Offline(keywords) => keywords.reply(message).await,
        }
    }
}

/// Gemini when the provider is `gemini` and an API key is available,
/// otherwise the offline keyword responder.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built or the base URL is
/// invalid.
pub fn responder_from_config(config: &ChatConfig) -> Result<Assistant, ChatError> {
    if config.provider == ChatProvider::Offline {
        return Ok(Assistant::Offline(KeywordResponder));
    }
    match config.resolved_api_key() {
        Some(key) => Ok(Assistant::Gemini(GeminiClient::from_config(config, key)?)),
        None => {
            tracing::info!("no chat API key configured, using offline responses");
            Ok(Assistant::Offline(KeywordResponder))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_provider_ignores_api_key() {
        let config = ChatConfig {
            provider: ChatProvider::Offline,
            api_key: Some("key".into()),
            ..ChatConfig::default()
        };
        assert!(responder_from_config(&config).unwrap().is_offline());
    }

    #[test]
    fn configured_key_selects_gemini() {
        let config = ChatConfig {
            api_key: Some("key".into()),
            ..ChatConfig::default()
        };
        assert!(!responder_from_config(&config).unwrap().is_offline());
    }

    #[test]
    fn prompt_is_dedented() {
        assert!(SYSTEM_PROMPT.starts_with("You are SukoonAI"));
        assert!(SYSTEM_PROMPT.contains("\n1. Keep responses brief"));
    }
}
