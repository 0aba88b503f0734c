use dioxus::prelude::*;
use dioxus_router::Link;
use services::RoadmapServiceError;
use tutor_core::model::RoadmapId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{RoadmapDetailVm, map_roadmap_cards};

fn roadmap_error(err: &RoadmapServiceError) -> ViewError {
    match err {
        RoadmapServiceError::NotFound => ViewError::NotFound,
        _ => ViewError::Unknown,
    }
}

#[component]
pub fn RoadmapsView() -> Element {
    let ctx = use_context::<AppContext>();
    let roadmaps = ctx.roadmaps();

    let resource = use_resource(move || {
        let roadmaps = roadmaps.clone();
        async move {
            let summaries = roadmaps.list().await.map_err(|err| {
                tracing::warn!(error = %err, "could not list roadmaps");
                roadmap_error(&err)
            })?;
            Ok::<_, ViewError>(map_roadmap_cards(&summaries))
        }
    });
    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page roadmaps",
            h2 { "Saved roadmaps" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                ViewState::Ready(cards) if cards.is_empty() => rsx! {
                    p { class: "muted", "No saved roadmaps yet. Save one from a learning pathway." }
                },
                ViewState::Ready(cards) => rsx! {
                    div { class: "roadmap-grid",
                        for card in cards {
                            Link {
                                key: "{card.id}",
                                class: "roadmap-card",
                                to: Route::Roadmap { roadmap_id: card.id },
                                h3 { "{card.title}" }
                                if let Some(description) = card.description.as_ref() {
                                    p { class: "muted", "{description}" }
                                }
                                div { class: "roadmap-meta",
                                    span { "{card.steps_label}" }
                                    span { "{card.created_at_str}" }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
pub fn RoadmapView(roadmap_id: RoadmapId) -> Element {
    let ctx = use_context::<AppContext>();
    let roadmaps = ctx.roadmaps();

    let resource = use_resource(use_reactive!(|(roadmap_id,)| {
        let roadmaps = roadmaps.clone();
        async move {
            let record = roadmaps
                .get(roadmap_id)
                .await
                .map_err(|err| roadmap_error(&err))?;
            Ok::<_, ViewError>(RoadmapDetailVm::from(&record))
        }
    }));
    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page roadmap",
            Link { class: "back", to: Route::Roadmaps {}, "← All roadmaps" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                ViewState::Ready(detail) => rsx! {
                    h2 { "{detail.title}" }
                    if let Some(description) = detail.description.as_ref() {
                        p { class: "muted", "{description}" }
                    }
                    p { class: "muted", "Saved {detail.created_at_str}" }
                    ol { class: "roadmap-steps",
                        for step in detail.steps.iter() {
                            li { key: "{step.number}",
                                h4 { "{step.number}. {step.title}" }
                                if let Some(description) = step.description.as_ref() {
                                    p { "{description}" }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
