//! The text-generation collaborator.
//!
//! The executor never talks to a provider directly. It is handed a
//! [`TextGenerator`] at construction, which lets the HTTP surface inject the
//! real API client and tests inject a stub.

use anyhow::Result;
use async_trait::async_trait;
use bragi_api::ChatClient;
use bragi_types::{DEFAULT_MODEL, ModelConfig, UserContext};
use serde_json::Value;
use tracing::{debug, warn};

/// Generate a JSON object from a fully-formed instruction.
///
/// Implementations return the model output parsed as JSON. The executor
/// treats every field of that object as optional, so implementations do not
/// need to fill defaults.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run the prompt with the given sampling configuration.
    ///
    /// `context` is the caller identity, passed through untouched.
    async fn generate(&self, prompt: &str, config: &ModelConfig, context: Option<&UserContext>) -> Result<Value>;

    /// Report whether the backing service is reachable.
    async fn health_check(&self) -> bool {
        true
    }
}

/// [`TextGenerator`] backed by the hosted chat-completions API.
#[derive(Debug, Clone)]
pub struct ApiTextGenerator {
    client: ChatClient,
    health_model: String,
}

impl ApiTextGenerator {
    /// Wrap an API client. Health checks ping [`DEFAULT_MODEL`].
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            health_model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Use a different model for health checks.
    pub fn with_health_model(mut self, model: impl Into<String>) -> Self {
        self.health_model = model.into();
        self
    }
}

#[async_trait]
impl TextGenerator for ApiTextGenerator {
    async fn generate(&self, prompt: &str, config: &ModelConfig, context: Option<&UserContext>) -> Result<Value> {
        debug!(
            model = %config.model,
            prompt_chars = prompt.chars().count(),
            user_id = context.map(|ctx| ctx.user_id.as_str()).unwrap_or_default(),
            "requesting completion"
        );
        let value = self.client.complete_json(prompt, config).await?;
        Ok(value)
    }

    async fn health_check(&self) -> bool {
        match self.client.ping(&self.health_model).await {
            Ok(()) => true,
            Err(error) => {
                warn!(error = %error, "text generation health check failed");
                false
            }
        }
    }
}
