use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator, use_route};
use tutor_core::model::{ChatId, RoadmapId};

use crate::context::{AppContext, ChatListRevision};
use crate::views::{
    ChatView, HomeView, RoadmapView, RoadmapsView, ViewError, ViewState, view_state_from_resource,
};
use crate::vm::format_datetime;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/chat/:chat_id", ChatView)] Chat { chat_id: ChatId },
        #[route("/roadmaps", RoadmapsView)] Roadmaps {},
        #[route("/roadmaps/:roadmap_id", RoadmapView)] Roadmap { roadmap_id: RoadmapId },
}

#[component]
fn Layout() -> Element {
    let revision = use_signal(|| 0_u64);
    use_context_provider(|| ChatListRevision::new(revision));

    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct ChatLinkVm {
    id: ChatId,
    title: String,
    created_at_str: String,
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let chat = ctx.chat();
    let user = ctx.user().clone();
    let revision = use_context::<ChatListRevision>();
    let navigator = use_navigator();
    let route = use_route::<Route>();
    let active_chat = match route {
        Route::Chat { chat_id } => Some(chat_id),
        _ => None,
    };

    let resource = {
        let chat = chat.clone();
        use_resource(move || {
            let chat = chat.clone();
            let user = user.clone();
            // Reload whenever a chat is created or deleted.
            let _ = revision.get();
            async move {
                let chats = chat
                    .list_chats(&user)
                    .await
                    .map_err(|_| ViewError::Unknown)?;
                Ok::<_, ViewError>(
                    chats
                        .iter()
                        .map(|item| ChatLinkVm {
                            id: item.id(),
                            title: item.title().to_string(),
                            created_at_str: format_datetime(item.created_at()),
                        })
                        .collect::<Vec<_>>(),
                )
            }
        })
    };

    let on_delete = use_callback(move |chat_id: ChatId| {
        let chat = chat.clone();
        let mut revision = revision;
        spawn(async move {
            match chat.delete_chat(chat_id).await {
                Ok(()) => {
                    revision.bump();
                    if active_chat == Some(chat_id) {
                        navigator.push(Route::Home {});
                    }
                }
                Err(err) => tracing::warn!(chat_id = %chat_id, error = %err, "delete chat failed"),
            }
        });
    });

    let state = view_state_from_resource(resource);

    rsx! {
        nav { class: "sidebar",
            h1 { "Tutor" }
            Link { class: "new-chat", to: Route::Home {}, "+ New chat" }
            Link { class: "roadmaps-link", to: Route::Roadmaps {}, "Saved roadmaps" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "muted", "{err.message()}" }
                },
                ViewState::Ready(chats) if chats.is_empty() => rsx! {
                    p { class: "muted", "No chats yet." }
                },
                ViewState::Ready(chats) => rsx! {
                    ul { class: "chat-list",
                        for item in chats {
                            li {
                                key: "{item.id}",
                                class: if active_chat == Some(item.id) { "chat-link active" } else { "chat-link" },
                                Link { to: Route::Chat { chat_id: item.id },
                                    span { class: "chat-title", "{item.title}" }
                                    span { class: "chat-date", "{item.created_at_str}" }
                                }
                                button {
                                    class: "chat-delete",
                                    r#type: "button",
                                    title: "Delete chat",
                                    onclick: move |_| on_delete.call(item.id),
                                    "✕"
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
