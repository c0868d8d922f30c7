//! Completion service clients.
//!
//! `OpenAiCompatibleClient` talks to any `/chat/completions` endpoint
//! (OpenRouter, OpenAI, a local gateway). `MockCompletionClient` returns a
//! canned answer for tests and offline runs.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default completion timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default cap on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Completion errors.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Cannot connect to completion service at {0}")]
    Connection(String),

    #[error("Completion timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse completion response: {0}")]
    ResponseParsing(String),

    #[error("Completion response contained no content")]
    EmptyResponse,
}

pub type CompletionResult<T> = Result<T, CompletionError>;

/// A service that turns a prompt into generated text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a completion for a single user message.
    async fn complete(&self, prompt: &str) -> CompletionResult<String>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

/// Settings for [`OpenAiCompatibleClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    /// Base URL without the `/chat/completions` suffix
    pub base_url: String,
    /// Bearer token; omitted from the request when `None`
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

/// Client for OpenAI-compatible chat completion APIs.
pub struct OpenAiCompatibleClient {
    settings: CompletionSettings,
    client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    /// Build a client. The timeout bounds the whole request.
    pub fn new(settings: CompletionSettings) -> CompletionResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| CompletionError::HttpClient(e.to_string()))?;

        Ok(Self {
            settings: CompletionSettings {
                base_url: settings.base_url.trim_end_matches('/').to_string(),
                ..settings
            },
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url)
    }
}

/// Request body for `/chat/completions`.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from `/chat/completions`.
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    async fn complete(&self, prompt: &str) -> CompletionResult<String> {
        let body = ChatRequest {
            model: &self.settings.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.settings.max_tokens,
            stream: false,
        };

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.settings.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error()
            } else {
                CompletionError::ResponseParsing(e.to_string())
            }
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(CompletionError::EmptyResponse)?;

        debug!(model = %self.settings.model, chars = content.len(), "Completion received");
        Ok(content)
    }

    fn model(&self) -> &str {
        &self.settings.model
    }
}

impl OpenAiCompatibleClient {
    fn classify(&self, e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            self.timeout_error()
        } else if e.is_connect() {
            CompletionError::Connection(self.settings.base_url.clone())
        } else {
            CompletionError::HttpClient(e.to_string())
        }
    }

    fn timeout_error(&self) -> CompletionError {
        CompletionError::Timeout(self.settings.timeout.as_secs())
    }
}

/// Mock completion client for testing.
///
/// Returns the configured text, or a connection error when built with
/// [`MockCompletionClient::failing`]. Every prompt it receives is recorded.
pub struct MockCompletionClient {
    response: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockCompletionClient {
    /// Client that always answers with `response`.
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Client whose every call fails as if the service were unreachable.
    pub fn failing() -> Self {
        Self {
            response: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, prompt: &str) -> CompletionResult<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        self.response
            .clone()
            .ok_or_else(|| CompletionError::Connection("mock".into()))
    }

    fn model(&self) -> &str {
        "mock"
    }
}
