use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::ai::ScriptedClient;
use services::{
    AppServices, ChatService, Clock, ProgressService, RoadmapService, ServicesConfig, VoteService,
};
use storage::repository::{KeyValueStore, Storage};
use tutor_core::model::{ChatId, LearningCard, Pathway, RoadmapId, User};
use tutor_core::time::fixed_now;

use crate::context::{UiApp, build_app_context};
use crate::views::{
    ChatView, HomeView, LearningCardView, LearningPathwayView, RoadmapView, RoadmapsView,
};

struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn user(&self) -> User {
        self.services.user().clone()
    }

    fn chat(&self) -> Arc<ChatService> {
        self.services.chat()
    }

    fn progress(&self) -> Arc<ProgressService> {
        self.services.progress()
    }

    fn votes(&self) -> Arc<VoteService> {
        self.services.votes()
    }

    fn roadmaps(&self) -> Arc<RoadmapService> {
        self.services.roadmaps()
    }
}

#[derive(Clone, PartialEq)]
pub enum ViewKind {
    Home,
    Chat(ChatId),
    Card(LearningCard),
    Pathway { scope: String, pathway: Pathway },
    Roadmaps,
    Roadmap(RoadmapId),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(app));
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    let on_ask = use_callback(|_question: String| {});
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Chat(chat_id) => rsx! { ChatView { chat_id } },
        ViewKind::Card(card) => rsx! { LearningCardView { card, on_ask } },
        ViewKind::Pathway { scope, pathway } => rsx! { LearningPathwayView { scope, pathway } },
        ViewKind::Roadmaps => rsx! { RoadmapsView {} },
        ViewKind::Roadmap(roadmap_id) => rsx! { RoadmapView { roadmap_id } },
    }
}

/// Services plus a handle on the key/value store, before any view is mounted.
pub struct TestBackend {
    pub services: AppServices,
    pub kv: Arc<dyn KeyValueStore>,
}

impl TestBackend {
    pub async fn new(replies: &[&str]) -> Self {
        Self::with_storage(Storage::in_memory(), replies).await
    }

    pub async fn with_storage(storage: Storage, replies: &[&str]) -> Self {
        let kv = Arc::clone(&storage.kv);
        let services = AppServices::with_storage(
            storage,
            Clock::fixed(fixed_now()),
            &ServicesConfig::default(),
            Arc::new(ScriptedClient::new(replies.iter().copied())),
        )
        .await
        .expect("services");
        Self { services, kv }
    }

    pub fn mount(&self, view: ViewKind) -> ViewHarness {
        let app = Arc::new(TestApp {
            services: self.services.clone(),
        });
        let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
        ViewHarness { dom }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let resources settle.
    pub async fn settle(&mut self) -> String {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
        self.render()
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}
