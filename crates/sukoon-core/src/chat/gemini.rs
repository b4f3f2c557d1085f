//! Google Generative Language API client (`generateContent`).

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::{Responder, MODEL_ACKNOWLEDGEMENT, SYSTEM_PROMPT};
use crate::error::ChatError;
use crate::storage::ChatConfig;

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
    top_p: f64,
    top_k: u32,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 3],
    generation_config: &'a GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

impl<'a> GenerateRequest<'a> {
    fn new(message: &'a str, generation_config: &'a GenerationConfig) -> Self {
        let turn = |role: &'static str, text: &'a str| Content {
            role,
            parts: [Part { text }],
        };
        Self {
            contents: [
                turn("user", SYSTEM_PROMPT),
                turn("model", MODEL_ACKNOWLEDGEMENT),
                turn("user", message),
            ],
            generation_config,
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    generation: GenerationConfig,
}

impl GeminiClient {
    /// # Errors
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &ChatConfig, api_key: String) -> Result<Self, ChatError> {
        if api_key.trim().is_empty() {
            return Err(ChatError::MissingApiKey);
        }

        // Url::join drops the last path segment unless it ends in '/'.
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)?.join(&format!(
            "v1beta/models/{}:generateContent",
            config.model
        ))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            generation: GenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
                top_p: config.top_p,
                top_k: config.top_k,
            },
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Responder for GeminiClient {
    async fn reply(&self, message: &str) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let body = GenerateRequest::new(message, &self.generation);
        tracing::debug!(endpoint = %self.endpoint, "sending chat request");

        let resp = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "chat API error");
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = resp.json().await?;
        data.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                ChatError::MalformedResponse("missing candidates[0].content.parts[0].text".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    const PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
        let config = ChatConfig {
            base_url: server.url(),
            ..ChatConfig::default()
        };
        GeminiClient::from_config(&config, "test-key".into()).unwrap()
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let config = ChatConfig {
            base_url: "https://proxy.example.com/google".into(),
            model: "gemini-1.5-pro".into(),
            ..ChatConfig::default()
        };
        let client = GeminiClient::from_config(&config, "k".into()).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://proxy.example.com/google/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn blank_key_is_rejected() {
        let err = GeminiClient::from_config(&ChatConfig::default(), " ".into()).unwrap_err();
        assert!(matches!(err, ChatError::MissingApiKey));
    }

    #[tokio::test]
    async fn sends_three_turns_and_reads_first_candidate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "contents": [
                    { "role": "user" },
                    { "role": "model", "parts": [{ "text": MODEL_ACKNOWLEDGEMENT }] },
                    { "role": "user", "parts": [{ "text": "I feel anxious" }] }
                ],
                "generationConfig": {
                    "temperature": 0.7,
                    "maxOutputTokens": 150,
                    "topP": 0.8,
                    "topK": 40
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [
                        { "content": { "parts": [{ "text": "Let's take a slow breath together." }] } }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let reply = client_for(&server).reply("I feel anxious").await.unwrap();
        assert_eq!(reply, "Let's take a slow breath together.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn sends_safety_settings() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_body(Matcher::PartialJson(json!({
                "safetySettings": [
                    { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                    { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                    { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                    { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" }
                ]
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#)
            .create_async()
            .await;

        assert_eq!(client_for(&server).reply("hi").await.unwrap(), "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(429)
            .with_body(r#"{"error":{"message":"quota"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).reply("hello").await.unwrap_err();
        match &err {
            ChatError::Upstream { status, body } => {
                assert_eq!(*status, 429);
                assert!(body.contains("quota"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.to_string(), "Failed to get AI response");
    }

    #[tokio::test]
    async fn missing_candidates_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let err = client_for(&server).reply("hello").await.unwrap_err();
        assert!(matches!(err, ChatError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn empty_message_never_hits_the_network() {
        let server = mockito::Server::new_async().await;
        let err = client_for(&server).reply("  ").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
    }
}
