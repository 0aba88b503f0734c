//! Model registry, prompt text, and the completion client seam.

pub mod client;
pub mod models;
pub mod prompts;

pub use client::{
    AiConfig, ChatCompletionClient, Completion, CompletionRequest, HttpCompletionClient,
    PromptMessage, ScriptedClient, extract_reasoning,
};
pub use models::{
    DEFAULT_CHAT_MODEL, ModelSpec, Provider, REASONING_MODEL, chat_models, default_model,
    find_model,
};
pub use prompts::{DocumentKind, system_prompt, update_document_prompt};
