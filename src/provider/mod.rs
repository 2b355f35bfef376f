// Upstream generative-AI client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::Framework;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to reach provider: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Anything that turns an instruction into model text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeProvider: Send + Sync {
    async fn generate(&self, instruction: &str) -> Result<String, ProviderError>;
}

/// The fixed instruction sent upstream for every request.
pub fn build_instruction(prompt: &str, framework: Framework) -> String {
    format!(
        "You are an experienced programmer with expertise in web development and UI/UX design. \
         You create modern, animated, and fully responsive UI components.\n\n\
         Now, generate a UI component for: {prompt}\n\
         Framework to use: {framework}\n\n\
         Requirements:\n\
         - Return ONLY the code in a single HTML file wrapped in Markdown fenced code block.\n\
         - Do NOT include explanation or extra text.\n"
    )
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<OutgoingPart<'a>>,
}

#[derive(Debug, Serialize)]
struct OutgoingPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<IncomingPart>,
}

#[derive(Debug, Deserialize)]
struct IncomingPart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, empty when the model produced none.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl GeminiClient {
    /// No request timeout is set; a stalled provider stalls the request.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CodeProvider for GeminiClient {
    async fn generate(&self, instruction: &str) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![OutgoingPart { text: instruction }],
            }],
        };

        tracing::debug!(model = %self.model, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(parsed.text())
    }
}
