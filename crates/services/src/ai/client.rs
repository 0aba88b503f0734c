use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tutor_core::model::Role;

use super::models::ModelSpec;
use crate::error::AiClientError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    /// Replaces every registry model name when set.
    pub model_override: Option<String>,
}

impl AiConfig {
    /// Reads `TUTOR_AI_API_KEY`, `TUTOR_AI_BASE_URL` and `TUTOR_AI_MODEL`.
    ///
    /// Returns `None` when no API key is configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("TUTOR_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("TUTOR_AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model_override = env::var("TUTOR_AI_MODEL")
            .ok()
            .filter(|model| !model.trim().is_empty());
        Some(Self {
            base_url,
            api_key,
            model_override,
        })
    }
}

/// One turn of conversation history sent with a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: &'static ModelSpec,
    pub system: String,
    pub messages: Vec<PromptMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Text shown to the user.
    pub text: String,
    /// Reasoning split off the reply, for models that emit it.
    pub reasoning: Option<String>,
}

/// Something that can answer a chat transcript.
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    #[must_use]
    fn enabled(&self) -> bool {
        true
    }

    /// Request a whole (non-streamed) reply.
    ///
    /// # Errors
    ///
    /// Returns `AiClientError` when the backend is unavailable or the reply is empty.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, AiClientError>;
}

/// Splits `<tag>…</tag>` sections out of `raw`.
///
/// Returns the remaining text, trimmed, and the joined reasoning if any was
/// found. An unterminated tag swallows the rest of the text.
#[must_use]
pub fn extract_reasoning(raw: &str, tag: &str) -> (String, Option<String>) {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let mut visible = String::with_capacity(raw.len());
    let mut thoughts: Vec<&str> = Vec::new();
    let mut rest = raw;
    while let Some(start) = rest.find(&open) {
        visible.push_str(&rest[..start]);
        let inner = &rest[start + open.len()..];
        match inner.find(&close) {
            Some(end) => {
                thoughts.push(inner[..end].trim());
                rest = &inner[end + close.len()..];
            }
            None => {
                thoughts.push(inner.trim());
                rest = "";
            }
        }
    }
    visible.push_str(rest);

    let reasoning = thoughts
        .into_iter()
        .filter(|thought| !thought.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let reasoning = (!reasoning.is_empty()).then_some(reasoning);
    (visible.trim().to_string(), reasoning)
}

//
// ─── HTTP CLIENT ───────────────────────────────────────────────────────────────
//

/// Talks to an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct HttpCompletionClient {
    client: Client,
    config: Option<AiConfig>,
}

impl HttpCompletionClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(AiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<AiConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ChatCompletionClient for HttpCompletionClient {
    fn enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, AiClientError> {
        let config = self.config.as_ref().ok_or(AiClientError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let model = config
            .model_override
            .clone()
            .unwrap_or_else(|| request.model.provider_model.to_string());

        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ChatMessage {
            role: Role::System.as_str(),
            content: request.system,
        });
        messages.extend(request.messages.into_iter().map(|message| ChatMessage {
            role: message.role.as_str(),
            content: message.content,
        }));
        let payload = ChatRequest {
            model,
            messages,
            temperature: 0.2,
        };

        tracing::debug!(model = %payload.model, turns = payload.messages.len(), "requesting completion");
        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "completion request rejected");
            return Err(AiClientError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let raw = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AiClientError::EmptyResponse)?;

        finish(&raw, request.model)
    }
}

fn finish(raw: &str, model: &ModelSpec) -> Result<Completion, AiClientError> {
    let (text, reasoning) = match model.reasoning_tag {
        Some(tag) => extract_reasoning(raw, tag),
        None => (raw.trim().to_string(), None),
    };
    if text.is_empty() {
        return Err(AiClientError::EmptyResponse);
    }
    Ok(Completion { text, reasoning })
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

//
// ─── SCRIPTED CLIENT ───────────────────────────────────────────────────────────
//

/// Replays canned replies in order and records every request.
///
/// Used by tests and the offline demo; runs dry with `EmptyResponse`.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    replies: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedClient {
    #[must_use]
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().map(Into::into).collect())),
            requests: Arc::default(),
        }
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatCompletionClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, AiClientError> {
        let model = request.model;
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request);
        }
        let raw = self
            .replies
            .lock()
            .map_err(|_| AiClientError::EmptyResponse)?
            .pop_front()
            .ok_or(AiClientError::EmptyResponse)?;
        finish(&raw, model)
    }
}
