//! OpenAI provider over the Responses API.
//!
//! Sends `POST {base_url}/responses` and returns the concatenated
//! `output_text` parts of the reply.
//!
//! ## Security
//!
//! The API key is held in an [`ApiCredential`] and only exposed when the
//! `Authorization` header is set.

use super::{
    factory::ProviderFactory,
    secrets::{ApiCredential, CredentialBuilder, CredentialSource},
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable name for the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable name for the optional OpenAI organization id.
pub const OPENAI_ORG_ID_ENV: &str = "OPENAI_ORG_ID";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI provider.
pub struct OpenAiProvider {
    credential: ApiCredential,
    organization: Option<ApiCredential>,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("credential", &self.credential)
            .field("organization", &self.organization)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiProvider {
    /// Create a provider with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            credential: ApiCredential::new(api_key, CredentialSource::Programmatic, "OpenAI API key"),
            organization: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create from JSON configuration with environment fallback.
    ///
    /// Recognized keys: `api_key`, `organization`, `base_url`.
    pub fn from_config(config: &JsonValue) -> Result<Self, ProviderError> {
        let mut creds = CredentialBuilder::new()
            .require("api_key", OPENAI_API_KEY_ENV, "OpenAI API key")
            .optional("organization", OPENAI_ORG_ID_ENV, "OpenAI organization")
            .build(config)?;

        let credential = creds
            .take("api_key")
            .ok_or_else(|| ProviderError::NotConfigured("OpenAI API key missing".to_string()))?;

        let base_url = config
            .get("base_url")
            .and_then(JsonValue::as_str)
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            credential,
            organization: creds.take("organization"),
            base_url,
            client: reqwest::Client::new(),
        })
    }

    /// Set custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

/// Responses API request body.
#[derive(Debug, Serialize)]
struct ResponsesRequest {
    model: String,
    input: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Responses API response body (only the fields we read).
#[derive(Debug, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    usage: Option<ResponsesUsage>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponsesUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
    #[serde(default)]
    input_tokens_details: Option<InputTokensDetails>,
}

#[derive(Debug, Deserialize)]
struct InputTokensDetails {
    #[serde(default)]
    cached_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

impl ResponsesBody {
    /// Concatenation of every `output_text` part of every `message` item.
    fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.type_ == "message")
            .flat_map(|item| item.content.iter())
            .filter(|part| part.type_ == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

fn build_request(messages: Vec<ChatMessage>, config: &CompletionConfig) -> ResponsesRequest {
    ResponsesRequest {
        model: config.model.clone(),
        input: messages,
        max_output_tokens: config.max_output_tokens,
        temperature: config.temperature,
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = build_request(messages, config);

        // SECURITY: Only expose the credential here, at the point of use
        let mut builder = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.credential.expose())
            .timeout(config.timeout)
            .json(&request);
        if let Some(organization) = &self.organization {
            builder = builder.header("OpenAI-Organization", organization.expose());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(config.timeout)
            } else {
                tracing::warn!(provider = "openai", error = %e, "Request failed");
                ProviderError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ProviderError::RateLimited { retry_after });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::AuthError);
        }

        if !status.is_success() {
            let message = match response.json::<OpenAiError>().await {
                Ok(body) => body.error.message,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            };
            tracing::warn!(provider = "openai", status = status.as_u16(), %message, "API error");
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: ResponsesBody = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let usage = body
            .usage
            .as_ref()
            .map(|u| TokenUsage {
                prompt_tokens: u.input_tokens,
                completion_tokens: u.output_tokens,
                cached_tokens: u
                    .input_tokens_details
                    .as_ref()
                    .map_or(0, |d| d.cached_tokens),
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: body.output_text(),
            usage,
            model: body.model,
            response_id: body.id,
        })
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Factory for creating OpenAI providers from configuration.
///
/// ## Configuration Format
/// ```json
/// {
///   "api_key": "sk-...",                  // Optional, falls back to OPENAI_API_KEY env
///   "organization": "org-...",            // Optional, falls back to OPENAI_ORG_ID env
///   "base_url": "https://..."             // Optional, custom API endpoint
/// }
/// ```
pub struct OpenAiProviderFactory;

impl ProviderFactory for OpenAiProviderFactory {
    fn provider_type(&self) -> &'static str {
        "openai"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        let provider = OpenAiProvider::from_config(config)?;
        Ok(Arc::new(provider))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        if !ApiCredential::is_available(config, "api_key", OPENAI_API_KEY_ENV) {
            return Err(ProviderError::NotConfigured(format!(
                "OpenAI API key required: set 'api_key' in config or {OPENAI_API_KEY_ENV} env"
            )));
        }

        if let Some(url) = config.get("base_url").and_then(JsonValue::as_str) {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ProviderError::NotConfigured(
                    "base_url must start with http:// or https://".to_string(),
                ));
            }
        }

        Ok(())
    }

    fn default_config(&self) -> JsonValue {
        serde_json::json!({
            "base_url": DEFAULT_BASE_URL
        })
    }

    fn description(&self) -> &'static str {
        "OpenAI Responses API provider"
    }
}
