use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::CompletionConfig;

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("azure_endpoint is not configured")]
    MissingEndpoint,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request failed with status code {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed completion payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("completion payload has no choices")]
    NoChoices,
}

/// Anything that can answer a single question.
///
/// Implementations never fail outward: `None` means no answer is available.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, question: &str) -> Option<String>;
}

/// One-shot client for an Azure OpenAI chat-completion deployment.
///
/// Each request opens its own HTTP session and closes it before returning.
pub struct CompletionClient {
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self { config }
    }

    /// Session for a single request: no idle pooling, no timeout.
    fn session() -> Result<reqwest::Client, CompletionError> {
        Ok(reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()?)
    }

    /// `{endpoint}openai/deployments/{deployment}/chat/completions?api-version={version}`
    fn url(&self) -> Result<String, CompletionError> {
        let endpoint = self
            .config
            .endpoint
            .as_deref()
            .ok_or(CompletionError::MissingEndpoint)?;
        let sep = if endpoint.ends_with('/') { "" } else { "/" };
        Ok(format!(
            "{}{}openai/deployments/{}/chat/completions?api-version={}",
            endpoint, sep, self.config.deployment, self.config.api_version
        ))
    }

    /// Send the question and return the first choice's text.
    pub async fn request(&self, question: &str) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                Message::system(self.config.system_prompt.as_str()),
                Message::user(question),
            ],
        };

        let url = self.url()?;
        // Dropped with this frame on every path, taking its connection with it
        let session = Self::session()?;

        let mut req = session.post(url).json(&body);
        if let Some(key) = &self.config.api_key {
            req = req.header("api-key", key);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if status != StatusCode::OK {
            return Err(CompletionError::Status { status, body: text });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        let first = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::NoChoices)?;

        // A null content (e.g. filtered output) reads as an empty answer
        Ok(first.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl Completion for CompletionClient {
    async fn complete(&self, question: &str) -> Option<String> {
        match self.request(question).await {
            Ok(answer) => {
                debug!(answer_len = answer.len(), "completion received");
                Some(answer)
            }
            Err(CompletionError::Status { status, body }) => {
                error!(status = status.as_u16(), body = %body, "completion request rejected");
                None
            }
            Err(e) => {
                warn!(error = %e, "completion request failed");
                None
            }
        }
    }
}
