use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::cli::chat::conversation_state::Message;
use crate::config::ChatConfig;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid model endpoint {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to model failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("model API error: {0}")]
    Api(String),

    #[error("malformed model response: {0}")]
    Malformed(String),
}

/// Text generation over an ordered message sequence.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, messages: &[Message]) -> Result<String, ModelError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for a local Ollama server's `/api/chat` endpoint.
pub struct OllamaClient {
    model: String,
    endpoint: Url,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: &ChatConfig) -> Result<Self, ModelError> {
        let endpoint = chat_endpoint(&config.base_url)?;

        Ok(Self {
            model: config.model.clone(),
            endpoint,
            client: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn generate(&self, messages: &[Message]) -> Result<String, ModelError> {
        let request_body = build_request(&self.model, messages);

        if let Ok(pretty) = serde_json::to_string_pretty(&request_body) {
            debug!("Sending request to {}: {}", self.endpoint, pretty);
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("API request failed with status {}: {}", status, body);
            return Err(ModelError::Status { status, body });
        }

        debug!("Received response from Ollama: {}", body);

        parse_reply(&body)
    }
}

fn chat_endpoint(base_url: &str) -> Result<Url, ModelError> {
    let invalid = |source| ModelError::InvalidUrl {
        url: base_url.to_string(),
        source,
    };

    // Without a trailing slash `join` would drop the last path segment.
    let mut base = Url::parse(base_url).map_err(invalid)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("api/chat").map_err(invalid)
}

fn build_request<'a>(model: &'a str, messages: &'a [Message]) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: messages
            .iter()
            .map(|message| WireMessage {
                role: message.role(),
                content: message.content(),
            })
            .collect(),
        stream: false,
    }
}

fn parse_reply(body: &str) -> Result<String, ModelError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ModelError::Malformed(e.to_string()))?;

    if let Some(message) = response.error {
        return Err(ModelError::Api(message));
    }

    response
        .message
        .map(|message| message.content)
        .ok_or_else(|| ModelError::Malformed("response has no message".to_string()))
}
