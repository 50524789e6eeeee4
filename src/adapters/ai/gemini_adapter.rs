//! Google Gemini adapter (Generative Language REST API, `generateContent`).

use crate::adapters::ai::{bounded, map_reqwest_error, provider_failure};
use crate::domain::{AdapterFailure, ServiceDescriptor, ServiceOutcome};
use crate::ports::AiServicePort;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub struct GeminiAdapter {
    client: reqwest::Client,
    descriptor: ServiceDescriptor,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiAdapter {
    /// # Arguments
    /// * `api_url` - API root (e.g., "https://generativelanguage.googleapis.com/v1beta")
    /// * `api_key` - Sent as `x-goog-api-key`
    /// * `model` - Model name (e.g., "gemini-2.5-flash")
    pub fn new(client: reqwest::Client, api_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            descriptor: ServiceDescriptor::gemini(),
            api_url,
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate(&self, message: &str) -> Result<String, AdapterFailure> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(message.to_string()),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            return Err(provider_failure(response).await);
        }

        let body: GenerateResponse = response.json().await.map_err(map_reqwest_error)?;
        let text = body.first_text();
        debug!(reply_len = text.len(), "received Gemini response");
        Ok(text)
    }
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate. Empty when the model returned none
    /// (e.g. blocked by safety filters).
    fn first_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl AiServicePort for GeminiAdapter {
    fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn ask(&self, message: &str, timeout: Duration) -> ServiceOutcome {
        bounded(&self.descriptor.id, timeout, self.generate(message)).await
    }
}
