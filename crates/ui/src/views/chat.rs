use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;
use services::VoteKind;
use tutor_core::model::{ChatId, MessageId, Role};

use crate::context::AppContext;
use crate::views::scripts::{copy_to_clipboard_script, scroll_to_bottom_script};
use crate::views::{
    Composer, LearningCardView, LearningPathwayView, ViewError, ViewState,
    view_state_from_resource,
};
use crate::vm::{
    GREETING_SUBTITLE, GREETING_TITLE, MessageBody, MessageVm, THINKING_LABEL, map_thread,
    show_thinking,
};

const THREAD_ID: &str = "thread";
const COPIED_MS: u64 = 1_500;

#[derive(Clone, Debug, PartialEq)]
struct ThreadData {
    chat_id: ChatId,
    title: String,
    messages: Vec<MessageVm>,
}

#[component]
pub fn ChatView(chat_id: ChatId) -> Element {
    let ctx = use_context::<AppContext>();
    let chat = ctx.chat();
    let votes = ctx.votes();
    let assistant_enabled = ctx.assistant_enabled();

    let mut pending = use_signal(|| false);
    let mut error = use_signal(|| None::<ViewError>);
    // Last user message a reply was requested for.
    let mut requested_for = use_signal(|| None::<MessageId>);

    let resource = {
        let chat = chat.clone();
        use_resource(use_reactive!(|(chat_id,)| {
            let chat = chat.clone();
            async move {
                let found = chat
                    .get_chat(chat_id)
                    .await
                    .map_err(|err| ViewError::from_chat(&err))?;
                let entries = chat
                    .thread(chat_id)
                    .await
                    .map_err(|err| ViewError::from_chat(&err))?;
                Ok::<_, ViewError>(ThreadData {
                    chat_id,
                    title: found.title().to_string(),
                    messages: map_thread(&entries),
                })
            }
        }))
    };

    let request_reply = {
        let chat = chat.clone();
        use_callback(move |chat_id: ChatId| {
            let chat = chat.clone();
            let mut resource = resource;
            pending.set(true);
            error.set(None);
            spawn(async move {
                let outcome = chat.request_reply(chat_id).await;
                pending.set(false);
                if let Err(err) = outcome {
                    error.set(Some(ViewError::from_chat(&err)));
                }
                resource.restart();
            });
        })
    };

    let on_send = {
        let chat = chat.clone();
        use_callback(move |text: String| {
            let chat = chat.clone();
            let mut resource = resource;
            error.set(None);
            spawn(async move {
                match chat.post_message(chat_id, &text).await {
                    Ok(entry) => {
                        requested_for.set(Some(entry.message.id()));
                        resource.restart();
                        request_reply.call(chat_id);
                    }
                    Err(err) => {
                        tracing::warn!(chat_id = %chat_id, error = %err, "could not send message");
                        error.set(Some(ViewError::from_chat(&err)));
                    }
                }
            });
        })
    };

    let on_vote = use_callback(move |(message_id, kind): (MessageId, VoteKind)| {
        let votes = votes.clone();
        let mut resource = resource;
        spawn(async move {
            match votes.vote(chat_id, message_id, kind).await {
                Ok(_) => resource.restart(),
                Err(err) => {
                    tracing::warn!(message_id = %message_id, error = %err, "vote failed");
                    error.set(Some(ViewError::Unknown));
                }
            }
        });
    });

    // A thread left ending in a user message (a new chat, or an app closed
    // mid-request) gets its reply requested once.
    use_effect(move || {
        let trailing = match resource.value().read().as_ref() {
            Some(Ok(data)) => data
                .messages
                .last()
                .filter(|last| last.role == Role::User)
                .map(|last| (data.chat_id, last.id)),
            _ => None,
        };
        let Some((chat_id, message_id)) = trailing else {
            return;
        };
        if *pending.peek() || *requested_for.peek() == Some(message_id) {
            return;
        }
        requested_for.set(Some(message_id));
        request_reply.call(chat_id);
    });

    use_effect(move || {
        let _ = resource.value().read();
        let _ = pending();
        let _ = eval(&scroll_to_bottom_script(THREAD_ID));
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "chat",
            if !assistant_enabled {
                div { class: "banner", "{ViewError::AssistantDisabled.message()}" }
            }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "error", p { "{err.message()}" } }
                },
                ViewState::Ready(data) => rsx! {
                    h2 { class: "chat-title", "{data.title}" }
                    div { id: THREAD_ID, class: "thread",
                        if data.messages.is_empty() {
                            Greeting {}
                        }
                        for (id, message) in data.messages.iter().map(|m| (m.id, m.clone())) {
                            MessageRow {
                                key: "{id}",
                                message,
                                on_vote,
                                on_ask: on_send,
                            }
                        }
                        if show_thinking(pending(), &data.messages) {
                            div { class: "message assistant thinking", "{THINKING_LABEL}" }
                        }
                    }
                    if let Some(err) = error() {
                        div { class: "error",
                            p { "{err.message()}" }
                            button {
                                r#type: "button",
                                disabled: pending(),
                                onclick: move |_| request_reply.call(data.chat_id),
                                "Retry"
                            }
                        }
                    }
                },
            }
            Composer {
                placeholder: "Ask a follow-up question...".to_string(),
                disabled: pending() || !assistant_enabled,
                on_submit: on_send,
            }
        }
    }
}

#[component]
pub(super) fn Greeting() -> Element {
    rsx! {
        div { class: "greeting",
            h2 { "{GREETING_TITLE}" }
            p { class: "muted", "{GREETING_SUBTITLE}" }
        }
    }
}

#[component]
fn MessageRow(
    message: MessageVm,
    on_vote: EventHandler<(MessageId, VoteKind)>,
    on_ask: EventHandler<String>,
) -> Element {
    let message_id = message.id;
    let can_vote = message.can_vote();
    let vote = message.vote;
    let role_class = message.role_class();
    let copy_text = match &message.body {
        MessageBody::Markdown { copy_text, .. } => Some(copy_text.clone()),
        MessageBody::Pathway(_) | MessageBody::Card(_) => None,
    };

    rsx! {
        div { class: role_class,
            match message.body {
                MessageBody::Pathway(pathway) => rsx! {
                    LearningPathwayView { scope: message_id.to_string(), pathway: *pathway }
                },
                MessageBody::Card(card) => rsx! {
                    LearningCardView { card: *card, on_ask }
                },
                MessageBody::Markdown { html, .. } => rsx! {
                    div { class: "markdown", dangerous_inner_html: "{html}" }
                },
            }
            div { class: "message-actions",
                if let Some(text) = copy_text {
                    CopyButton { text }
                }
                if can_vote {
                    button {
                        r#type: "button",
                        class: if vote == Some(true) { "vote active" } else { "vote" },
                        title: "Helpful",
                        onclick: move |_| on_vote.call((message_id, VoteKind::Up)),
                        "👍"
                    }
                    button {
                        r#type: "button",
                        class: if vote == Some(false) { "vote active" } else { "vote" },
                        title: "Not helpful",
                        onclick: move |_| on_vote.call((message_id, VoteKind::Down)),
                        "👎"
                    }
                }
            }
        }
    }
}

#[component]
fn CopyButton(text: String) -> Element {
    let mut copied = use_signal(|| false);

    rsx! {
        button {
            r#type: "button",
            class: "copy",
            onclick: move |_| {
                let _ = eval(&copy_to_clipboard_script(&text));
                copied.set(true);
                spawn(async move {
                    tokio::time::sleep(Duration::from_millis(COPIED_MS)).await;
                    copied.set(false);
                });
            },
            if copied() { "Copied!" } else { "Copy" }
        }
    }
}
