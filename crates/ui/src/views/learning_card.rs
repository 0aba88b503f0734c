use dioxus::prelude::*;
use tutor_core::model::LearningCard;

use crate::vm::{CardTab, card_badges, numbered_questions, resource_vms};

/// Tabbed explainer for a single topic.
///
/// Related topics and suggested questions are sent back through `on_ask`
/// as follow-up questions.
#[component]
pub fn LearningCardView(card: LearningCard, on_ask: EventHandler<String>) -> Element {
    let mut active_tab = use_signal(CardTab::default);
    let badges = card_badges(&card);

    rsx! {
        section { class: "learning-card",
            h2 { class: "card-title", "{card.title}" }
            if !badges.is_empty() {
                div { class: "badges",
                    for badge in badges {
                        span { class: "badge", "{badge}" }
                    }
                }
            }

            div { class: "tabs", role: "tablist",
                for tab in CardTab::ALL {
                    button {
                        r#type: "button",
                        class: if active_tab() == tab { "tab active" } else { "tab" },
                        aria_pressed: "{active_tab() == tab}",
                        onclick: move |_| active_tab.set(tab),
                        "{tab.label()}"
                    }
                }
            }

            div { class: "card-body",
                match active_tab() {
                    CardTab::Overview => rsx! { OverviewTab { card: card.clone() } },
                    CardTab::Concepts => rsx! { ConceptsTab { card: card.clone() } },
                    CardTab::Explore => rsx! { ExploreTab { card: card.clone(), on_ask } },
                }
            }
        }
    }
}

#[component]
fn OverviewTab(card: LearningCard) -> Element {
    rsx! {
        div { class: "panel",
            h3 { "Description" }
            p { "{card.overview}" }
        }
        if !card.prerequisites.is_empty() {
            h3 { "Prerequisites:" }
            ul {
                for item in card.prerequisites.iter() {
                    li { "{item}" }
                }
            }
        }
        div { class: "panel",
            h3 { "Key Terminologies" }
            for term in card.key_terminologies.iter() {
                div { class: "term",
                    h4 { "{term.title}" }
                    if let Some(description) = term.description.as_ref() {
                        p { class: "muted", "{description}" }
                    }
                    if !term.examples.is_empty() {
                        ul { class: "examples",
                            for example in term.examples.iter() {
                                li { "{example}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ConceptsTab(card: LearningCard) -> Element {
    rsx! {
        div { class: "panel",
            for concept in card.concepts.iter() {
                div { class: "concept",
                    h4 { "{concept.title}" }
                    p { class: "muted", "{concept.description}" }
                    if !concept.examples.is_empty() {
                        ul { class: "examples",
                            for example in concept.examples.iter() {
                                li { "{example}" }
                            }
                        }
                    }
                    for snippet in concept.code_snippets.iter() {
                        div { class: "snippet",
                            if let Some(title) = snippet.title.as_ref() {
                                h5 { "{title}" }
                            }
                            pre {
                                code { class: snippet.language.as_ref().map(|lang| format!("language-{lang}")).unwrap_or_default(),
                                    "{snippet.code}"
                                }
                            }
                            if let Some(explanation) = snippet.explanation.as_ref() {
                                p { class: "muted", "{explanation}" }
                            }
                        }
                    }
                }
            }
        }
        if !card.common_mistakes.is_empty() {
            div { class: "panel",
                h3 { "Common Mistakes" }
                ul {
                    for item in card.common_mistakes.iter() {
                        li {
                            strong { "{item.mistake}" }
                            " → {item.correction}"
                        }
                    }
                }
            }
        }
        if !card.practice_exercises.is_empty() {
            div { class: "panel",
                h3 { "Practice" }
                for exercise in card.practice_exercises.iter() {
                    div { class: "exercise",
                        h4 {
                            "{exercise.title}"
                            if let Some(difficulty) = exercise.difficulty.as_ref() {
                                span { class: "badge", "{difficulty}" }
                            }
                        }
                        p { "{exercise.description}" }
                        for hint in exercise.hints.iter() {
                            p { class: "hint", "Hint: {hint}" }
                        }
                        if let Some(solution) = exercise.solution.as_ref() {
                            details {
                                summary { "Show solution" }
                                p { "{solution}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ExploreTab(card: LearningCard, on_ask: EventHandler<String>) -> Element {
    let resources = resource_vms(&card.resources);

    rsx! {
        div { class: "panel",
            h3 { "Related Topics:" }
            div { class: "chips",
                for topic in card.explore.related_topics.iter().cloned() {
                    AskButton { class: "chip", text: topic, on_ask }
                }
            }
        }
        h3 { "Suggested Questions:" }
        ol { class: "questions",
            for (number, question) in numbered_questions(&card) {
                li { key: "{number}",
                    AskButton { class: "question", text: question, on_ask }
                }
            }
        }
        if !resources.is_empty() {
            h3 { "Resources:" }
            ul { class: "resources",
                for resource in resources {
                    li {
                        a {
                            href: "{resource.link.href}",
                            target: resource.link.target(),
                            rel: if resource.link.external { "noopener noreferrer" },
                            "{resource.link.label}"
                        }
                        if let Some(kind) = resource.kind.as_ref() {
                            span { class: "badge", "{kind}" }
                        }
                        if let Some(description) = resource.description.as_ref() {
                            p { class: "muted", "{description}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AskButton(class: &'static str, text: String, on_ask: EventHandler<String>) -> Element {
    let label = text.clone();
    rsx! {
        button {
            r#type: "button",
            class,
            onclick: move |_| on_ask.call(text.clone()),
            "{label}"
        }
    }
}
