use dioxus::prelude::*;
use dioxus_router::use_navigator;
use tutor_core::model::Visibility;

use crate::context::{AppContext, ChatListRevision};
use crate::routes::Route;
use crate::views::ViewError;
use crate::views::chat::Greeting;
use crate::views::Composer;

/// Landing page: the first message starts a chat and opens it.
#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let chat = ctx.chat();
    let user = ctx.user().clone();
    let assistant_enabled = ctx.assistant_enabled();
    let navigator = use_navigator();
    let revision = ChatListRevision::current();

    let mut starting = use_signal(|| false);
    let mut error = use_signal(|| None::<ViewError>);

    let on_submit = use_callback(move |text: String| {
        let chat = chat.clone();
        let user = user.clone();
        let mut revision = revision;
        starting.set(true);
        error.set(None);
        spawn(async move {
            let outcome = chat.start_chat(&user, &text, Visibility::Private).await;
            starting.set(false);
            match outcome {
                Ok((started, _)) => {
                    if let Some(revision) = revision.as_mut() {
                        revision.bump();
                    }
                    navigator.push(Route::Chat {
                        chat_id: started.id(),
                    });
                }
                Err(err) => {
                    tracing::warn!(error = %err, "could not start chat");
                    error.set(Some(ViewError::from_chat(&err)));
                }
            }
        });
    });

    rsx! {
        div { class: "home",
            if !assistant_enabled {
                div { class: "banner", "{ViewError::AssistantDisabled.message()}" }
            }
            Greeting {}
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
            Composer {
                placeholder: "Ask about any topic...".to_string(),
                disabled: starting() || !assistant_enabled,
                on_submit,
            }
        }
    }
}
