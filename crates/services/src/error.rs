//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use tutor_core::model::{ChatError, UserError};
use tutor_core::progress::ProgressError;

/// Errors emitted by completion clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiClientError {
    #[error("the assistant is not configured; set TUTOR_AI_API_KEY")]
    Disabled,
    #[error("the assistant returned an empty response")]
    EmptyResponse,
    #[error("assistant request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `ChatService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatServiceError {
    #[error("chat not found")]
    ChatNotFound,
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Ai(#[from] AiClientError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `VoteService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VoteServiceError {
    #[error("message not found in this chat")]
    MessageNotFound,
    #[error("only assistant messages can be voted on")]
    NotAssistantMessage,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `RoadmapService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RoadmapServiceError {
    #[error("pathway has no steps to save")]
    EmptyPathway,
    #[error("roadmap not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error("unknown chat model: {0}")]
    UnknownModel(String),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Chat(#[from] ChatServiceError),
}
