use dioxus::prelude::*;
use services::{AiClientError, ChatServiceError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    NotFound,
    AssistantDisabled,
    AssistantFailed,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Unknown => "Something went wrong. Please try again.",
            ViewError::NotFound => "This item no longer exists.",
            ViewError::AssistantDisabled => {
                "The assistant is not configured. Set TUTOR_AI_API_KEY and restart."
            }
            ViewError::AssistantFailed => "The assistant could not answer. Please try again.",
        }
    }

    /// Collapse a service failure into what the user can act on.
    #[must_use]
    pub fn from_chat(err: &ChatServiceError) -> Self {
        match err {
            ChatServiceError::ChatNotFound => ViewError::NotFound,
            ChatServiceError::Ai(AiClientError::Disabled) => ViewError::AssistantDisabled,
            ChatServiceError::Ai(_) => ViewError::AssistantFailed,
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_errors_map_to_actionable_messages() {
        assert_eq!(
            ViewError::from_chat(&ChatServiceError::ChatNotFound),
            ViewError::NotFound
        );
        assert_eq!(
            ViewError::from_chat(&ChatServiceError::Ai(AiClientError::Disabled)),
            ViewError::AssistantDisabled
        );
        assert_eq!(
            ViewError::from_chat(&ChatServiceError::Ai(AiClientError::EmptyResponse)),
            ViewError::AssistantFailed
        );
        assert!(ViewError::AssistantDisabled.message().contains("TUTOR_AI_API_KEY"));
    }
}
