use std::sync::Arc;

use storage::repository::{KeyValueStore, Storage, StorageError};
use tutor_core::model::{ChatId, Level, LearningCard, Pathway, Role, Visibility};
use tutor_core::payload::{AssistantReply, classify_message};
use tutor_core::progress::{PathwayProgress, storage_keys};

use super::test_harness::{TestBackend, ViewKind};

const PATHWAY_REPLY: &str = r#"{"learningPathway": {
  "title": "Frontend Basics",
  "description": "From markup to interactivity.",
  "levels": {
    "Beginner": [
      {"title": "HTML", "quizzes": [{"question": "Paragraph tag?", "options": ["<p>", "<div>"], "answer": "<p>"}]},
      {"title": "CSS"},
      {"title": "DOM"}
    ],
    "Advanced": [{"title": "Performance"}]
  }
}}"#;

const CARD_REPLY: &str = r#"{"learningCard": {
  "title": "Flexbox",
  "overview": "One-dimensional layout.",
  "difficulty": "Intermediate",
  "estimatedTime": "20 minutes",
  "explore": {"relatedTopics": ["Grid"], "suggestedQuestions": ["When to use gap?"]}
}}"#;

fn pathway(raw: &str) -> Pathway {
    match classify_message(Role::Assistant, raw) {
        AssistantReply::Pathway(pathway) => *pathway,
        other => panic!("expected pathway, got {other:?}"),
    }
}

fn card(raw: &str) -> LearningCard {
    match classify_message(Role::Assistant, raw) {
        AssistantReply::Card(card) => *card,
        other => panic!("expected card, got {other:?}"),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_greeting() {
    let backend = TestBackend::new(&[]).await;
    let mut harness = backend.mount(ViewKind::Home);
    let html = harness.settle().await;
    assert!(html.contains("Hello there!"), "missing greeting in {html}");
    assert!(html.contains("What would you like to learn today?"), "{html}");
    assert!(html.contains("Send"), "missing composer in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn card_view_smoke_renders_badges_and_tabs() {
    let backend = TestBackend::new(&[]).await;
    let mut harness = backend.mount(ViewKind::Card(card(CARD_REPLY)));
    harness.rebuild();
    let html = harness.render();
    for expected in ["Flexbox", "Intermediate", "20 minutes", "Overview", "Concepts", "Explore"] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(html.contains("One-dimensional layout."), "overview tab not open in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn pathway_view_smoke_renders_saved_progress() {
    let backend = TestBackend::new(&[]).await;
    let pathway = pathway(PATHWAY_REPLY);
    let mut progress = PathwayProgress::new();
    backend
        .services
        .progress()
        .mark_completed("reply-1", &mut progress, &pathway, Level::Beginner, 0)
        .await
        .expect("mark completed");

    let mut harness = backend.mount(ViewKind::Pathway {
        scope: "reply-1".to_string(),
        pathway,
    });
    let html = harness.settle().await;
    for expected in [
        "Your Learning Journey",
        "25% Complete",
        "1 of 4 steps completed",
        "1/3",
        "0/1",
        "🏆",
        "CSS",
        "Reset Progress",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(!html.contains("Performance"), "advanced steps shown on the beginner tab: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn pathway_view_smoke_resets_corrupted_progress() {
    let backend = TestBackend::new(&[]).await;
    let (completed_key, _) = storage_keys("reply-2");
    backend
        .kv
        .set_many(&[(completed_key.clone(), "not json".to_string())])
        .await
        .expect("seed corrupted progress");

    let mut harness = backend.mount(ViewKind::Pathway {
        scope: "reply-2".to_string(),
        pathway: pathway(PATHWAY_REPLY),
    });
    let html = harness.settle().await;
    assert!(html.contains("could not be read and was reset"), "missing notice in {html}");
    assert!(html.contains("0% Complete"), "{html}");
    assert_eq!(backend.kv.get(&completed_key).await.expect("get"), None);
}

#[tokio::test(flavor = "current_thread")]
async fn pathway_view_smoke_renders_empty_level() {
    let backend = TestBackend::new(&[]).await;
    let mut harness = backend.mount(ViewKind::Pathway {
        scope: "reply-3".to_string(),
        pathway: pathway(r#"{"learningPathway": {"title": "Empty"}}"#),
    });
    let html = harness.settle().await;
    assert!(html.contains("No content available for this level."), "{html}");
    assert!(html.contains("0 of 0 steps completed"), "{html}");
}

struct FailingKv;

#[async_trait::async_trait]
impl KeyValueStore for FailingKv {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn set_many(&self, _entries: &[(String, String)]) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn remove_many(&self, _keys: &[String]) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn pathway_view_smoke_renders_error_state() {
    let storage = Storage {
        kv: Arc::new(FailingKv),
        ..Storage::in_memory()
    };
    let backend = TestBackend::with_storage(storage, &[]).await;
    let mut harness = backend.mount(ViewKind::Pathway {
        scope: "reply-4".to_string(),
        pathway: pathway(PATHWAY_REPLY),
    });
    let html = harness.settle().await;
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chat_view_smoke_renders_structured_replies() {
    let backend = TestBackend::new(&[CARD_REPLY, PATHWAY_REPLY]).await;
    let chat = backend.services.chat();
    let (started, _) = chat
        .start_chat(backend.services.user(), "Explain flexbox", Visibility::Private)
        .await
        .expect("start chat");
    chat.request_reply(started.id()).await.expect("card reply");
    chat.send_message(started.id(), "Now a roadmap for the frontend")
        .await
        .expect("pathway reply");

    let mut harness = backend.mount(ViewKind::Chat(started.id()));
    let html = harness.settle().await;
    for expected in [
        "Explain flexbox",
        "Flexbox",
        "Frontend Basics",
        "Your Learning Journey",
        "👍",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(!html.contains("Hello there!"), "greeting shown for a non-empty thread: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chat_view_smoke_renders_markdown_safely() {
    let backend = TestBackend::new(&["Use **flex** <script>alert(1)</script>"]).await;
    let chat = backend.services.chat();
    let (started, _) = chat
        .start_chat(backend.services.user(), "Explain flexbox", Visibility::Private)
        .await
        .expect("start chat");
    chat.request_reply(started.id()).await.expect("reply");

    let mut harness = backend.mount(ViewKind::Chat(started.id()));
    let html = harness.settle().await;
    assert!(html.contains("<strong>flex</strong>"), "{html}");
    assert!(!html.contains("<script>"), "unsanitized html in {html}");
    assert!(html.contains("Copy"), "missing copy button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn chat_view_smoke_renders_missing_chat() {
    let backend = TestBackend::new(&[]).await;
    let mut harness = backend.mount(ViewKind::Chat(ChatId::random()));
    let html = harness.settle().await;
    assert!(html.contains("This item no longer exists."), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn roadmap_views_smoke_render_saved_pathway() {
    let backend = TestBackend::new(&[]).await;
    let roadmap_id = backend
        .services
        .roadmaps()
        .save_pathway(&pathway(PATHWAY_REPLY))
        .await
        .expect("save roadmap");

    let mut list = backend.mount(ViewKind::Roadmaps);
    let html = list.settle().await;
    assert!(html.contains("Frontend Basics"), "{html}");
    assert!(html.contains("4 steps"), "{html}");

    let mut detail = backend.mount(ViewKind::Roadmap(roadmap_id));
    let html = detail.settle().await;
    assert!(html.contains("1. Beginner: HTML"), "{html}");
    assert!(html.contains("4. Advanced: Performance"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn roadmaps_view_smoke_renders_empty_state() {
    let backend = TestBackend::new(&[]).await;
    let mut harness = backend.mount(ViewKind::Roadmaps);
    let html = harness.settle().await;
    assert!(html.contains("No saved roadmaps yet."), "{html}");
}
