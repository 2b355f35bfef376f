// Generation proxy: one endpoint that relays prompts to the provider

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::models::{ErrorBody, Framework, GenerationRequest, GenerationResponse, HealthResponse};
use crate::provider::{build_instruction, CodeProvider, GeminiClient, ProviderError};

/// Request bodies above this size are refused before the handler runs.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Whether the server can reach a provider, decided once at startup.
#[derive(Clone)]
pub enum GenerationCapability {
    Available(Arc<dyn CodeProvider>),
    MissingCredential,
}

impl GenerationCapability {
    pub fn from_config(config: &ServerConfig) -> Self {
        config.api_key.as_ref().map_or(Self::MissingCredential, |key| {
            Self::Available(Arc::new(GeminiClient::new(
                config.provider_base_url.clone(),
                config.model.clone(),
                key.clone(),
            )))
        })
    }

    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl std::fmt::Debug for GenerationCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(_) => f.write_str("Available"),
            Self::MissingCredential => f.write_str("MissingCredential"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    capability: GenerationCapability,
}

impl AppState {
    pub const fn new(capability: GenerationCapability) -> Self {
        Self { capability }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Server missing GENAI_API_KEY in environment")]
    MissingCredential,
    #[error("Request body too large")]
    BodyTooLarge,
    #[error("Request body could not be read")]
    UnreadableBody(#[source] BytesRejection),
    #[error("Invalid JSON body")]
    InvalidBody(#[source] serde_json::Error),
    #[error("Unsupported framework: {0}")]
    UnsupportedFramework(String),
    #[error("Prompt is required")]
    EmptyPrompt,
    #[error("Generation failed on provider")]
    Provider(#[from] ProviderError),
}

impl ProxyError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnreadableBody(_)
            | Self::InvalidBody(_) | Self::UnsupportedFramework(_) | Self::EmptyPrompt => {
                StatusCode::BAD_REQUEST
            }
            Self::MissingCredential | Self::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BytesRejection> for ProxyError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::BodyTooLarge
        } else {
            Self::UnreadableBody(rejection)
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody::new(self.to_string());
        let body = match &self {
            Self::BodyTooLarge => body.with_details(format!("Limit is {MAX_BODY_BYTES} bytes")),
            Self::UnreadableBody(source) => body.with_details(source.body_text()),
            Self::InvalidBody(source) => body.with_details(source.to_string()),
            Self::Provider(source) => body.with_details(source.to_string()),
            _ => body,
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Loose shape of the incoming body; validation happens after parsing.
#[derive(Debug, Default, Deserialize)]
struct GenerateBody {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    framework: Option<String>,
}

fn parse_request(body: &[u8]) -> Result<GenerationRequest, ProxyError> {
    let parsed = if body.iter().all(u8::is_ascii_whitespace) {
        GenerateBody::default()
    } else {
        serde_json::from_slice::<Option<GenerateBody>>(body)
            .map_err(ProxyError::InvalidBody)?
            .unwrap_or_default()
    };

    let framework = match parsed.framework.as_deref().map(str::trim) {
        None | Some("") => Framework::default(),
        Some(id) => id
            .parse()
            .map_err(|_| ProxyError::UnsupportedFramework(id.to_string()))?,
    };

    let prompt = parsed.prompt.unwrap_or_default();
    if prompt.trim().is_empty() {
        return Err(ProxyError::EmptyPrompt);
    }

    Ok(GenerationRequest::new(prompt, framework))
}

async fn generate(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<GenerationResponse>, ProxyError> {
    let GenerationCapability::Available(provider) = &state.capability else {
        tracing::error!("generation requested but no provider credential is configured");
        return Err(ProxyError::MissingCredential);
    };

    let body = body
        .map_err(ProxyError::from)
        .inspect_err(|e| tracing::warn!("Rejected body: {e}"))?;
    let request = parse_request(&body).inspect_err(|e| tracing::warn!("Bad request: {e}"))?;

    tracing::info!(
        framework = %request.framework,
        prompt_chars = request.prompt.chars().count(),
        "forwarding generation request"
    );

    let instruction = build_instruction(&request.prompt, request.framework);
    let code = provider.generate(&instruction).await.map_err(|e| {
        tracing::error!(error = %e, "Generation failed");
        ProxyError::from(e)
    })?;

    Ok(Json(GenerationResponse { code }))
}

async fn method_not_allowed() -> ProxyError {
    ProxyError::MethodNotAllowed
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        generation_available: state.capability.is_available(),
    })
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/generate", post(generate).fallback(method_not_allowed))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl+C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let capability = GenerationCapability::from_config(&config);
    if capability.is_available() {
        tracing::info!(model = %config.model, "generation provider configured");
    } else {
        tracing::warn!("GENAI_API_KEY is not set; /api/generate will answer 500 until it is");
    }

    let app = router(AppState::new(capability));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener on {addr}"))?;
    let local = listener
        .local_addr()
        .context("Failed to get local address")?;

    tracing::info!("Generation server listening on http://{local}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Generation server error")?;

    tracing::info!("Generation server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
    }
}
