// Client for the generation proxy

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::models::{ErrorBody, GenerationRequest, GenerationResponse, HealthResponse};

#[derive(Debug, Clone)]
pub struct ProxyClient {
    base_url: String,
    client: Client,
}

impl ProxyClient {
    pub fn new(base_url: String, request_timeout: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn with_default_url() -> Result<Self> {
        Self::new("http://localhost:5000".to_string(), 600)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .context("Failed to send generate request")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            match serde_json::from_str::<ErrorBody>(&text) {
                Ok(ErrorBody {
                    error,
                    details: Some(details),
                }) => anyhow::bail!("{error} ({status}): {details}"),
                Ok(ErrorBody { error, .. }) => anyhow::bail!("{error} ({status})"),
                Err(_) => anyhow::bail!("Generation failed with status {status}: {text}"),
            }
        }

        let result = response
            .json::<GenerationResponse>()
            .await
            .context("Failed to parse generate response")?;

        Ok(result)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/api/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send health request")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Health check failed: {status}");
        }

        response
            .json::<HealthResponse>()
            .await
            .context("Failed to parse health response")
    }

    pub async fn health_check(&self) -> bool {
        self.health().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Framework;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        let client = ProxyClient::new("http://localhost:5000/".to_string(), 30);
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_client_with_default_url() {
        let client = ProxyClient::with_default_url();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_generate_posts_request_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_json(json!({"prompt": "a blue button", "framework": "html-css-js"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"code": "```html\n<b></b>\n```"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ProxyClient::new(server.uri(), 5).unwrap();
        let request = GenerationRequest::new("a blue button", Framework::HtmlCssJs);
        let response = tokio_test::assert_ok!(client.generate(&request).await);
        assert_eq!(response.code, "```html\n<b></b>\n```");
    }

    #[tokio::test]
    async fn test_generate_reports_server_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "Generation failed on provider",
                "details": "quota exceeded"
            })))
            .mount(&server)
            .await;

        let client = ProxyClient::new(server.uri(), 5).unwrap();
        let err = client
            .generate(&GenerationRequest::new("x", Framework::ReactCss))
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("Generation failed on provider"));
        assert!(err.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_generate_reports_plain_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = ProxyClient::new(server.uri(), 5).unwrap();
        let err = client
            .generate(&GenerationRequest::new("x", Framework::HtmlCssJs))
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("502"));
        assert!(err.contains("bad gateway"));
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "ok", "generationAvailable": false})),
            )
            .mount(&server)
            .await;

        let client = ProxyClient::new(server.uri(), 5).unwrap();
        let health = client.health().await.unwrap();
        assert!(!health.generation_available);
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        // Nothing listens on the discard port
        let client = ProxyClient::new("http://127.0.0.1:9".to_string(), 1).unwrap();
        assert!(!client.health_check().await);
    }
}
