use std::sync::Arc;

use dioxus::prelude::*;
use services::{ChatService, ProgressService, RoadmapService, VoteService};
use tutor_core::model::User;

/// What the UI needs from the composition root.
pub trait UiApp: Send + Sync {
    fn user(&self) -> User;

    fn chat(&self) -> Arc<ChatService>;
    fn progress(&self) -> Arc<ProgressService>;
    fn votes(&self) -> Arc<VoteService>;
    fn roadmaps(&self) -> Arc<RoadmapService>;
}

#[derive(Clone)]
pub struct AppContext {
    user: User,
    chat: Arc<ChatService>,
    progress: Arc<ProgressService>,
    votes: Arc<VoteService>,
    roadmaps: Arc<RoadmapService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            user: app.user(),
            chat: app.chat(),
            progress: app.progress(),
            votes: app.votes(),
            roadmaps: app.roadmaps(),
        }
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn assistant_enabled(&self) -> bool {
        self.chat.assistant_enabled()
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

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: Arc<dyn UiApp>) -> AppContext {
    AppContext::new(&app)
}

/// Bumped whenever a chat is created or deleted so the sidebar reloads.
#[derive(Clone, Copy)]
pub struct ChatListRevision(Signal<u64>);

impl ChatListRevision {
    #[must_use]
    pub fn new(signal: Signal<u64>) -> Self {
        Self(signal)
    }

    #[must_use]
    pub fn get(&self) -> u64 {
        (self.0)()
    }

    pub fn bump(&mut self) {
        *self.0.write() += 1;
    }

    /// The sidebar's revision, when the view is mounted under the layout.
    #[must_use]
    pub fn current() -> Option<Self> {
        try_consume_context::<Self>()
    }
}
