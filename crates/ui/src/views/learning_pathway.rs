use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::Link;
use services::RoadmapServiceError;
use tutor_core::model::{Pathway, RoadmapId, Step};
use tutor_core::progress::{Completion, PathwayProgress, Restored};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    CELEBRATION_MS, ConfettiPiece, PathwayNav, QuizOptionVm, QuizVm, TrackerVm, confetti,
    further_learning, level_icon, level_tone, quiz_vm, resource_vms, step_rows, tracker,
};

const CORRUPTED_NOTICE: &str = "Saved progress could not be read and was reset.";
const EMPTY_LEVEL: &str = "No content available for this level.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizPick {
    pub step: usize,
    pub quiz: usize,
    pub option: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RoadmapSave {
    Saving,
    Saved(RoadmapId),
    Empty,
    Failed,
}

/// Interactive roadmap: level tabs, step checklist, quizzes and a progress
/// tracker persisted under `scope`.
#[component]
pub fn LearningPathwayView(scope: String, pathway: Pathway) -> Element {
    let ctx = use_context::<AppContext>();
    let progress_service = ctx.progress();
    let roadmaps = ctx.roadmaps();

    let mut progress = use_signal(PathwayProgress::new);
    // Step and quiz actions wait for the stored progress.
    let mut loaded = use_signal(|| false);
    let mut nav = {
        let pathway = pathway.clone();
        use_signal(move || PathwayNav::new(&pathway))
    };
    let notice = use_signal(|| None::<&'static str>);
    let error = use_signal(|| None::<ViewError>);
    let celebration = use_signal(|| None::<(u64, Vec<ConfettiPiece>)>);
    let mut roadmap_save = use_signal(|| None::<RoadmapSave>);

    let resource = {
        let service = progress_service.clone();
        let scope = scope.clone();
        use_resource(move || {
            let service = service.clone();
            let scope = scope.clone();
            let mut notice = notice;
            async move {
                let (stored, restored) = service.load(&scope).await.map_err(|err| {
                    tracing::warn!(scope = %scope, error = %err, "could not load pathway progress");
                    ViewError::Unknown
                })?;
                progress.set(stored);
                loaded.set(true);
                if restored == Restored::Corrupted {
                    notice.set(Some(CORRUPTED_NOTICE));
                }
                Ok::<_, ViewError>(())
            }
        })
    };

    let on_complete = {
        let service = progress_service.clone();
        let scope = scope.clone();
        let pathway = pathway.clone();
        use_callback(move |index: usize| {
            if !*loaded.peek() {
                return;
            }
            let Some(level) = nav.peek().active_level() else {
                return;
            };
            let service = service.clone();
            let scope = scope.clone();
            let pathway = pathway.clone();
            let mut error = error;
            let mut celebration = celebration;
            spawn(async move {
                // Replaced by the committed progress.
                let mut next = PathwayProgress::new();
                match service
                    .mark_completed(&scope, &mut next, &pathway, level, index)
                    .await
                {
                    Ok(Completion::Newly) => {
                        progress.set(next);
                        error.set(None);
                        let generation = celebration.peek().as_ref().map_or(0, |(g, _)| g + 1);
                        celebration.set(Some((generation, confetti(&mut rand::rng()))));
                        tokio::time::sleep(Duration::from_millis(CELEBRATION_MS)).await;
                        if celebration.peek().as_ref().is_some_and(|(g, _)| *g == generation) {
                            celebration.set(None);
                        }
                    }
                    Ok(Completion::Already) => {}
                    Err(err) => {
                        tracing::warn!(scope = %scope, error = %err, "could not save step completion");
                        error.set(Some(ViewError::Unknown));
                    }
                }
            });
        })
    };

    let on_answer = {
        let service = progress_service.clone();
        let scope = scope.clone();
        let pathway = pathway.clone();
        use_callback(move |pick: QuizPick| {
            if !*loaded.peek() {
                return;
            }
            let Some(level) = nav.peek().active_level() else {
                return;
            };
            let service = service.clone();
            let scope = scope.clone();
            let pathway = pathway.clone();
            let mut error = error;
            spawn(async move {
                let mut next = PathwayProgress::new();
                match service
                    .answer_quiz(&scope, &mut next, &pathway, level, pick.step, pick.quiz, &pick.option)
                    .await
                {
                    Ok(_) => {
                        progress.set(next);
                        error.set(None);
                    }
                    Err(err) => {
                        tracing::warn!(scope = %scope, error = %err, "could not save quiz answer");
                        error.set(Some(ViewError::Unknown));
                    }
                }
            });
        })
    };

    let on_reset = {
        let service = progress_service.clone();
        let scope = scope.clone();
        use_callback(move |()| {
            let service = service.clone();
            let scope = scope.clone();
            let mut error = error;
            let mut notice = notice;
            spawn(async move {
                let mut next = progress.peek().clone();
                match service.reset(&scope, &mut next).await {
                    Ok(()) => {
                        progress.set(next);
                        notice.set(None);
                        error.set(None);
                    }
                    Err(err) => {
                        tracing::warn!(scope = %scope, error = %err, "could not reset progress");
                        error.set(Some(ViewError::Unknown));
                    }
                }
            });
        })
    };

    let on_save_roadmap = {
        let pathway = pathway.clone();
        use_callback(move |()| {
            let roadmaps = roadmaps.clone();
            let pathway = pathway.clone();
            roadmap_save.set(Some(RoadmapSave::Saving));
            spawn(async move {
                let outcome = match roadmaps.save_pathway(&pathway).await {
                    Ok(id) => RoadmapSave::Saved(id),
                    Err(RoadmapServiceError::EmptyPathway) => RoadmapSave::Empty,
                    Err(err) => {
                        tracing::warn!(error = %err, "could not save roadmap");
                        RoadmapSave::Failed
                    }
                };
                roadmap_save.set(Some(outcome));
            });
        })
    };

    let load_state = view_state_from_resource(resource);
    let ready = loaded();
    let nav_value = nav();
    let active_level = nav_value.active_level();
    let (tracker_vm, rows, expanded) = {
        let current = progress.read();
        let expanded = nav_value.expanded_step().zip(active_level).and_then(|(index, level)| {
            let step = pathway.step(level, index)?.clone();
            let quizzes: Vec<QuizVm> = step
                .quizzes
                .iter()
                .enumerate()
                .map(|(quiz_index, quiz)| quiz_vm(&current, level, index, quiz_index, quiz))
                .collect();
            Some((index, step, quizzes, current.is_step_completed(level, index)))
        });
        (
            tracker(&pathway, &current),
            step_rows(&pathway, &current, nav_value),
            expanded,
        )
    };
    let further = further_learning(&pathway.further_learning);
    let levels = pathway.level_names();

    rsx! {
        section { class: "pathway",
            if let Some((_, pieces)) = celebration() {
                div { class: "confetti", aria_hidden: "true",
                    for (i, piece) in pieces.iter().enumerate() {
                        span { key: "{i}", class: "confetti-piece", style: "{piece.style()}" }
                    }
                }
            }

            h2 { class: "pathway-title", "{pathway.title}" }
            p { class: "muted", "{pathway.description}" }
            if !pathway.prerequisites.is_empty() {
                div { class: "prerequisites",
                    h4 { "Prerequisites:" }
                    ul {
                        for item in pathway.prerequisites.iter() {
                            li { "{item}" }
                        }
                    }
                }
            }

            match load_state {
                ViewState::Error(err) => rsx! {
                    div { class: "error",
                        p { "{err.message()}" }
                        button {
                            r#type: "button",
                            onclick: move |_| {
                                let mut resource = resource;
                                resource.restart();
                            },
                            "Retry"
                        }
                    }
                },
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "muted", "Loading progress..." }
                },
                ViewState::Ready(()) => rsx! {
                    Tracker { tracker: tracker_vm, on_reset }
                },
            }

            if let Some(message) = notice() {
                p { class: "notice", "{message}" }
            }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }

            div { class: "level-tabs",
                for level in levels {
                    button {
                        key: "{level}",
                        r#type: "button",
                        class: if active_level == Some(level) { "level-tab active" } else { "level-tab" },
                        aria_pressed: "{active_level == Some(level)}",
                        onclick: move |_| nav.write().select_level(level),
                        span { class: "icon", "{level_icon(level)}" }
                        span { "{level}" }
                    }
                }
            }

            div { class: "steps",
                if rows.is_empty() {
                    p { class: "empty", "{EMPTY_LEVEL}" }
                }
                for row in rows {
                    div {
                        key: "{row.index}",
                        class: if row.completed { "step completed" } else { "step" },
                        button {
                            r#type: "button",
                            class: "step-header",
                            onclick: move |_| nav.write().toggle_step(row.index),
                            if row.completed {
                                span { class: "trophy", "🏆" }
                            } else {
                                span { class: "step-number", "{row.number}" }
                            }
                            span { class: "step-title", "{row.title}" }
                            span { class: if row.expanded { "chevron open" } else { "chevron" }, "▾" }
                        }
                        if let Some((index, step, quizzes, completed)) = expanded.clone().filter(|(index, ..)| *index == row.index) {
                            StepDetail { index, step, quizzes, completed, ready, on_complete, on_answer }
                        }
                    }
                }
            }

            if !further.is_empty() {
                div { class: "further-learning",
                    h3 { "🚀 Further Learning" }
                    for item in further {
                        div { class: "further-item",
                            h4 { "{item.topic}" }
                            p { class: "muted", "{item.description}" }
                            if !item.links.is_empty() {
                                h5 { "Resources:" }
                                ul {
                                    for link in item.links {
                                        li {
                                            a {
                                                href: "{link.href}",
                                                target: link.target(),
                                                rel: if link.external { "noopener noreferrer" },
                                                "{link.label}"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            div { class: "roadmap-save",
                match roadmap_save() {
                    Some(RoadmapSave::Saved(id)) => rsx! {
                        span { "Saved. " }
                        Link { to: Route::Roadmap { roadmap_id: id }, "Open roadmap" }
                    },
                    Some(RoadmapSave::Empty) => rsx! {
                        span { class: "muted", "This pathway has no steps to save." }
                    },
                    Some(RoadmapSave::Failed) => rsx! {
                        span { class: "error", "{ViewError::Unknown.message()}" }
                    },
                    Some(RoadmapSave::Saving) | None => rsx! {
                        button {
                            r#type: "button",
                            class: "secondary",
                            disabled: roadmap_save() == Some(RoadmapSave::Saving),
                            onclick: move |_| on_save_roadmap.call(()),
                            "Save as roadmap"
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn Tracker(tracker: TrackerVm, on_reset: EventHandler<()>) -> Element {
    rsx! {
        div { class: "tracker",
            div { class: "tracker-header",
                h3 { "🏆 Your Learning Journey" }
                span { class: "percent", "{tracker.percent_label}" }
                button {
                    r#type: "button",
                    class: "reset",
                    onclick: move |_| on_reset.call(()),
                    "Reset Progress"
                }
            }
            div { class: "progress-bar",
                div { class: "progress-fill", style: "width: {tracker.percentage}%;" }
                for milestone in tracker.milestones.iter() {
                    span {
                        key: "{milestone.at}",
                        class: if milestone.reached { "milestone reached" } else { "milestone" },
                        style: "left: {milestone.at}%;",
                        if milestone.reached { "✦" }
                    }
                }
            }
            p { class: "steps-label", "⭐ {tracker.steps_label}" }
            div { class: "level-bars",
                for bar in tracker.levels.iter() {
                    div { key: "{bar.level}", class: "level-bar",
                        div { class: "level-bar-header",
                            span { "{level_icon(bar.level)} {bar.level}" }
                            span { class: "count", "{bar.count_label}" }
                        }
                        div { class: "bar",
                            div {
                                class: "bar-fill {level_tone(bar.level)}",
                                style: "width: {bar.percentage}%;",
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StepDetail(
    index: usize,
    step: Step,
    quizzes: Vec<QuizVm>,
    completed: bool,
    ready: bool,
    on_complete: EventHandler<usize>,
    on_answer: EventHandler<QuizPick>,
) -> Element {
    let resources = resource_vms(&step.resources);
    let introduction = step
        .content
        .introduction
        .clone()
        .filter(|text| !text.trim().is_empty());

    rsx! {
        div { class: "step-detail",
            if !step.learning_objectives.is_empty() {
                h4 { "Learning Objectives:" }
                ul {
                    for objective in step.learning_objectives.iter() {
                        li { "{objective}" }
                    }
                }
            }
            if let Some(introduction) = introduction {
                h5 { "Introduction:" }
                p { "{introduction}" }
            }
            if !step.content.explanation.trim().is_empty() {
                h5 { "Explanation:" }
                p { "{step.content.explanation}" }
            }
            if !step.content.examples.is_empty() {
                h5 { "Examples:" }
                for example in step.content.examples.iter() {
                    div { class: "example",
                        if let Some(title) = example.title.as_ref() {
                            h6 { "{title}" }
                        }
                        p { "{example.description}" }
                        if let Some(code) = example.code.as_ref() {
                            pre { code { "{code}" } }
                        }
                    }
                }
            }
            if !step.key_takeaways.is_empty() {
                h4 { "Key Takeaways:" }
                ul {
                    for takeaway in step.key_takeaways.iter() {
                        li { "{takeaway}" }
                    }
                }
            }
            if !resources.is_empty() {
                h4 { "Resources:" }
                div { class: "resources",
                    for resource in resources {
                        a {
                            class: "resource",
                            href: "{resource.link.href}",
                            target: resource.link.target(),
                            rel: if resource.link.external { "noopener noreferrer" },
                            strong { "{resource.link.label}" }
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
            if !quizzes.is_empty() {
                h4 { "Quizzes:" }
                for quiz in quizzes {
                    QuizBlock { step: index, quiz, ready, on_answer }
                }
            }
            button {
                r#type: "button",
                class: if completed { "complete done" } else { "complete" },
                disabled: !ready,
                onclick: move |_| on_complete.call(index),
                if completed { "🏆 Completed!" } else { "⭐ Mark as Completed" }
            }
        }
    }
}

#[component]
fn QuizBlock(step: usize, quiz: QuizVm, ready: bool, on_answer: EventHandler<QuizPick>) -> Element {
    let quiz_index = quiz.index;
    rsx! {
        div { class: "quiz",
            h5 { "{quiz.heading}" }
            p { "{quiz.question}" }
            div { class: "quiz-options",
                for option in quiz.options.iter().cloned() {
                    QuizOptionButton {
                        option,
                        disabled: !ready,
                        on_pick: move |picked: String| {
                            on_answer.call(QuizPick { step, quiz: quiz_index, option: picked });
                        },
                    }
                }
            }
            if let Some(answer) = quiz.correct_answer.as_ref() {
                p { class: "correct-answer", "Correct answer: {answer}" }
            }
            if let Some(explanation) = quiz.explanation.as_ref() {
                p { class: "explanation",
                    strong { "Explanation:" }
                    " {explanation}"
                }
            }
        }
    }
}

#[component]
fn QuizOptionButton(option: QuizOptionVm, disabled: bool, on_pick: EventHandler<String>) -> Element {
    let label = option.text.clone();
    rsx! {
        button {
            r#type: "button",
            class: option.tone.class(),
            disabled,
            onclick: move |_| on_pick.call(option.text.clone()),
            "{label}"
        }
    }
}
