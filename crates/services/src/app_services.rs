use std::sync::Arc;

use storage::repository::Storage;
use tutor_core::model::User;

use crate::Clock;
use crate::ai::{ChatCompletionClient, find_model};
use crate::chat_service::ChatService;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::roadmap_service::RoadmapService;
use crate::vote_service::VoteService;

/// Email of the local learner when none is configured.
pub const DEFAULT_USER_EMAIL: &str = "learner@localhost";

#[derive(Clone, Debug)]
pub struct ServicesConfig {
    pub user_email: String,
    /// Logical chat model id; the registry default when `None`.
    pub chat_model: Option<String>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            user_email: DEFAULT_USER_EMAIL.to_string(),
            chat_model: None,
        }
    }
}

/// Assembles app-facing services and resolves the local user.
#[derive(Clone)]
pub struct AppServices {
    user: User,
    chat: Arc<ChatService>,
    progress: Arc<ProgressService>,
    votes: Arc<VoteService>,
    roadmaps: Arc<RoadmapService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization, model lookup, or
    /// user setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: &ServicesConfig,
        ai: Arc<dyn ChatCompletionClient>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::with_storage(storage, clock, config, ai).await
    }

    /// Build services over in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if model lookup or user setup fails.
    pub async fn in_memory(
        clock: Clock,
        config: &ServicesConfig,
        ai: Arc<dyn ChatCompletionClient>,
    ) -> Result<Self, AppServicesError> {
        Self::with_storage(Storage::in_memory(), clock, config, ai).await
    }

    /// Build services over an already assembled `Storage`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if model lookup or user setup fails.
    pub async fn with_storage(
        storage: Storage,
        clock: Clock,
        config: &ServicesConfig,
        ai: Arc<dyn ChatCompletionClient>,
    ) -> Result<Self, AppServicesError> {
        let mut chat = ChatService::new(
            clock,
            Arc::clone(&storage.users),
            Arc::clone(&storage.chats),
            Arc::clone(&storage.messages),
            Arc::clone(&storage.votes),
            ai,
        );
        if let Some(model_id) = config.chat_model.as_deref() {
            let model = find_model(model_id)
                .filter(|model| model.selectable)
                .ok_or_else(|| AppServicesError::UnknownModel(model_id.to_string()))?;
            chat = chat.with_model(model);
        }
        let user = chat.ensure_user(&config.user_email).await?;
        tracing::info!(model = chat.model().id, assistant = chat.assistant_enabled(), "services ready");

        Ok(Self {
            user,
            chat: Arc::new(chat),
            progress: Arc::new(ProgressService::new(Arc::clone(&storage.kv))),
            votes: Arc::new(VoteService::new(
                Arc::clone(&storage.messages),
                Arc::clone(&storage.votes),
            )),
            roadmaps: Arc::new(RoadmapService::new(clock, Arc::clone(&storage.roadmaps))),
        })
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn chat(&self) -> Arc<ChatService> {
        Arc::clone(&self.chat)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn votes(&self) -> Arc<VoteService> {
        Arc::clone(&self.votes)
    }

    #[must_use]
    pub fn roadmaps(&self) -> Arc<RoadmapService> {
        Arc::clone(&self.roadmaps)
    }
}
