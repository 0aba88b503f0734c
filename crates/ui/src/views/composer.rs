use dioxus::prelude::*;

/// Message box; Enter sends, Shift+Enter adds a line.
#[component]
pub fn Composer(
    placeholder: String,
    disabled: bool,
    on_submit: EventHandler<String>,
) -> Element {
    let mut draft = use_signal(String::new);

    let mut submit = move || {
        let text = draft.peek().trim().to_string();
        if text.is_empty() || disabled {
            return;
        }
        draft.set(String::new());
        on_submit.call(text);
    };

    let can_send = !disabled && !draft.read().trim().is_empty();

    rsx! {
        form {
            class: "composer",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                submit();
            },
            textarea {
                id: "composer-input",
                rows: "2",
                placeholder: "{placeholder}",
                value: "{draft}",
                oninput: move |evt: FormEvent| draft.set(evt.value()),
                onkeydown: move |evt: KeyboardEvent| {
                    if evt.data.key() == Key::Enter && !evt.data.modifiers().contains(Modifiers::SHIFT) {
                        evt.prevent_default();
                        submit();
                    }
                },
            }
            button {
                r#type: "submit",
                class: "send",
                disabled: !can_send,
                "Send"
            }
        }
    }
}
