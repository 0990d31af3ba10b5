//! Chat-completions API client utilities.
//!
//! This module provides a lightweight client for the hosted text-generation
//! provider (a Groq/OpenAI-compatible `chat/completions` endpoint).
//! It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Discovering credentials from `GROQ_API_KEY`
//! - Validating `GROQ_API_BASE` for safety
//! - Requesting JSON-object completions and decoding the model's JSON output
//!
//! The primary entry point is [`ChatClient`]. Create an instance via
//! [`ChatClient::new_from_env`] or [`ChatClient::new`], then call
//! [`ChatClient::complete_json`].
//!
//! # Example
//!
//! ```ignore
//! use bragi_api::ChatClient;
//! use bragi_types::{ModelConfig, TaskKind};
//!
//! # async fn demo() -> Result<(), bragi_api::ApiError> {
//! let client = ChatClient::new_from_env()?;
//! let value = client
//!     .complete_json("Respond with {\"ok\": true}", &ModelConfig::for_task(TaskKind::CatchUp))
//!     .await?;
//! println!("{value}");
//! # Ok(())
//! # }
//! ```

use std::env;
use std::time::Duration;

use bragi_types::ModelConfig;
use reqwest::{Client, Url, header};
use serde_json::Value;
use tracing::debug;

mod completion;
mod error;

pub use completion::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat, parse_json_content};
pub use error::ApiError;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";
/// Environment variable overriding the provider base URL.
pub const API_BASE_ENV: &str = "GROQ_API_BASE";
/// Base URL used when `GROQ_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Allowed hostnames or base domains for non-local base URLs.
/// Subdomains of these domains are also allowed.
const ALLOWED_PROVIDER_DOMAINS: &[&str] = &["groq.com", "openai.com"];
/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);
const PING_MAX_TOKENS: u32 = 5;

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for the completions API.
///
/// The client pre-configures the bearer token and JSON headers, and builds
/// requests against a validated base URL.
pub struct ChatClient {
    base_url: String,
    http: Client,
    user_agent: String,
}

impl ChatClient {
    /// Construct a [`ChatClient`] from `GROQ_API_KEY` and `GROQ_API_BASE`.
    ///
    /// The base URL falls back to [`DEFAULT_API_BASE`]. A missing or blank
    /// API key is an error.
    pub fn new_from_env() -> Result<Self, ApiError> {
        let base_url = env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::new(base_url, &api_key_from_env()?)
    }

    /// Construct a client for an explicit base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT)
    }

    /// Construct a client with a custom per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, api_key: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;

        let mut default_headers = header::HeaderMap::new();
        let authorization = header::HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|_| ApiError::InvalidHeader("authorization"))?;
        default_headers.insert(header::AUTHORIZATION, authorization);
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder().default_headers(default_headers).timeout(timeout).build()?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("bragi/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// The validated base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a chat-completions request and decode the provider envelope.
    pub async fn complete(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse, ApiError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(%url, model = %request.model, max_tokens = request.max_tokens, "sending completion request");

        let response = self
            .http
            .post(&url)
            .header(header::USER_AGENT, &self.user_agent)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::status(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(ApiError::InvalidEnvelope)
    }

    /// Send a single-prompt request in JSON-object mode and return the
    /// model's output parsed as a JSON object.
    pub async fn complete_json(&self, prompt: &str, config: &ModelConfig) -> Result<Value, ApiError> {
        let request = ChatCompletionRequest::json_prompt(prompt, config);
        let response = self.complete(&request).await?;
        let content = response.first_content().ok_or(ApiError::EmptyResponse)?;
        parse_json_content(content)
    }

    /// Issue a minimal completion to confirm the provider is reachable.
    pub async fn ping(&self, model: &str) -> Result<(), ApiError> {
        let request = ChatCompletionRequest {
            messages: vec![ChatMessage::user("ping")],
            model: model.to_string(),
            temperature: None,
            max_tokens: PING_MAX_TOKENS,
            top_p: None,
            response_format: None,
        };
        self.complete(&request).await.map(|_| ())
    }
}

/// Read the provider API key from `GROQ_API_KEY`. Blank values count as missing.
pub fn api_key_from_env() -> Result<String, ApiError> {
    env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or(ApiError::MissingApiKey)
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS, and host must be one of the allowed
///   provider domains or a subdomain thereof
pub fn validate_base_url(base: &str) -> Result<(), ApiError> {
    let parsed_base_url = Url::parse(base).map_err(|e| ApiError::invalid_base_url(base, e.to_string()))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| ApiError::invalid_base_url(base, "URL must include a host"))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(ApiError::invalid_base_url(
            base,
            format!("must use https for non-localhost hosts; got '{}://'", parsed_base_url.scheme()),
        ));
    }

    let is_allowed_domain = ALLOWED_PROVIDER_DOMAINS.iter().any(|&allowed_domain| {
        host_name.eq_ignore_ascii_case(allowed_domain) || host_name.ends_with(&format!(".{}", allowed_domain))
    });
    if !is_allowed_domain {
        return Err(ApiError::invalid_base_url(
            base,
            format!(
                "host '{}' is not allowed; must be one of {:?} or a subdomain, or localhost",
                host_name, ALLOWED_PROVIDER_DOMAINS
            ),
        ));
    }

    Ok(())
}
