//! Registry of the logical models the app can talk to.

/// Logical model used for chat replies unless another is selected.
pub const DEFAULT_CHAT_MODEL: &str = "chat-model-small";

/// Logical id of the model that reasons inside `<think>` tags.
pub const REASONING_MODEL: &str = "chat-model-reasoning";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Google,
    Fireworks,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelSpec {
    /// Logical id used across the app, e.g. `chat-model-small`.
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub provider: Provider,
    /// Model name sent to the provider endpoint.
    pub provider_model: &'static str,
    /// Tag wrapping reasoning text that must be split off the visible reply.
    pub reasoning_tag: Option<&'static str>,
    /// Whether the user can pick this model for chatting.
    pub selectable: bool,
}

const MODELS: &[ModelSpec] = &[
    ModelSpec {
        id: "chat-model-small",
        name: "Small model",
        description: "Small model for fast, lightweight tasks",
        provider: Provider::Google,
        provider_model: "gemini-1.5-pro-latest",
        reasoning_tag: None,
        selectable: true,
    },
    ModelSpec {
        id: "chat-model-large",
        name: "Large model",
        description: "Large model for complex, multi-step tasks",
        provider: Provider::Google,
        provider_model: "gemini-1.5-flash-latest",
        reasoning_tag: None,
        selectable: true,
    },
    ModelSpec {
        id: REASONING_MODEL,
        name: "Reasoning model",
        description: "Uses advanced reasoning",
        provider: Provider::Fireworks,
        provider_model: "accounts/fireworks/models/deepseek-r1",
        reasoning_tag: Some("think"),
        selectable: true,
    },
    ModelSpec {
        id: "title-model",
        name: "Title model",
        description: "Names new chats",
        provider: Provider::Google,
        provider_model: "gemini-1.5-pro-latest",
        reasoning_tag: None,
        selectable: false,
    },
    ModelSpec {
        id: "artifact-model",
        name: "Artifact model",
        description: "Writes documents and code",
        provider: Provider::Google,
        provider_model: "gemini-1.5-flash-latest",
        reasoning_tag: None,
        selectable: false,
    },
];

#[must_use]
pub fn find_model(id: &str) -> Option<&'static ModelSpec> {
    MODELS.iter().find(|model| model.id == id)
}

/// The registered default chat model.
#[must_use]
pub fn default_model() -> &'static ModelSpec {
    &MODELS[0]
}

/// Models offered in the model picker, in display order.
pub fn chat_models() -> impl Iterator<Item = &'static ModelSpec> {
    MODELS.iter().filter(|model| model.selectable)
}
