//! Together.ai adapter (OpenAI-compatible chat completions).
//!
//! Works against any endpoint speaking the `/v1/chat/completions` schema.

use crate::adapters::ai::{bounded, map_reqwest_error, provider_failure};
use crate::domain::{AdapterFailure, ServiceDescriptor, ServiceOutcome};
use crate::ports::AiServicePort;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.7;

pub struct TogetherAdapter {
    client: reqwest::Client,
    descriptor: ServiceDescriptor,
    api_url: String,
    api_key: String,
    model: String,
}

impl TogetherAdapter {
    /// # Arguments
    /// * `api_url` - Full completions endpoint (e.g., "https://api.together.xyz/v1/chat/completions")
    /// * `api_key` - Bearer token
    /// * `model` - Model name (e.g., "meta-llama/Llama-3.2-11B-Vision-Instruct-Turbo")
    pub fn new(client: reqwest::Client, api_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            descriptor: ServiceDescriptor::together(),
            api_url,
            api_key,
            model,
        }
    }

    async fn complete(&self, message: &str) -> Result<String, AdapterFailure> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: message,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            return Err(provider_failure(response).await);
        }

        let chat_response: ChatResponse = response.json().await.map_err(map_reqwest_error)?;
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        debug!(reply_len = content.len(), "received Together response");
        Ok(content)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[async_trait::async_trait]
impl AiServicePort for TogetherAdapter {
    fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn ask(&self, message: &str, timeout: Duration) -> ServiceOutcome {
        bounded(&self.descriptor.id, timeout, self.complete(message)).await
    }
}
