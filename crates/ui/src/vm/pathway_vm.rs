use rand::Rng;
use tutor_core::model::{FurtherLearning, Level, Pathway, Quiz, link_target};
use tutor_core::progress::{MILESTONES, PathwayProgress, Progress, QuizStatus};

/// Pieces in one celebration burst.
pub const CONFETTI_PIECES: usize = 50;

pub const CONFETTI_PALETTE: [&str; 6] = [
    "#FFD700", "#FF6347", "#4169E1", "#32CD32", "#FF69B4", "#9370DB",
];

/// How long the celebration stays on screen after a new completion.
pub const CELEBRATION_MS: u64 = 2_000;

//
// ─── NAVIGATION ────────────────────────────────────────────────────────────────
//

/// Which level tab is open and which step (at most one) is expanded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathwayNav {
    active_level: Option<Level>,
    expanded_step: Option<usize>,
}

impl PathwayNav {
    /// Opens Beginner, or the first level the pathway has.
    #[must_use]
    pub fn new(pathway: &Pathway) -> Self {
        let active_level = if pathway.has_level(Level::Beginner) {
            Some(Level::Beginner)
        } else {
            pathway.level_names().first().copied()
        };
        Self {
            active_level,
            expanded_step: None,
        }
    }

    #[must_use]
    pub fn active_level(&self) -> Option<Level> {
        self.active_level
    }

    #[must_use]
    pub fn expanded_step(&self) -> Option<usize> {
        self.expanded_step
    }

    /// Switching tabs collapses the open step.
    pub fn select_level(&mut self, level: Level) {
        if self.active_level != Some(level) {
            self.active_level = Some(level);
            self.expanded_step = None;
        }
    }

    pub fn toggle_step(&mut self, index: usize) {
        self.expanded_step = if self.expanded_step == Some(index) {
            None
        } else {
            Some(index)
        };
    }
}

//
// ─── TRACKER ───────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackerVm {
    pub percentage: u8,
    pub percent_label: String,
    pub steps_label: String,
    pub milestones: Vec<MilestoneVm>,
    pub levels: Vec<LevelBarVm>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MilestoneVm {
    pub at: u8,
    pub reached: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelBarVm {
    pub level: Level,
    pub count_label: String,
    pub percentage: u8,
}

#[must_use]
pub fn tracker(pathway: &Pathway, progress: &PathwayProgress) -> TrackerVm {
    let overall: Progress = progress.overall(pathway);
    TrackerVm {
        percentage: overall.percentage,
        percent_label: format!("{}% Complete", overall.percentage),
        steps_label: format!(
            "{} of {} steps completed",
            overall.completed, overall.total
        ),
        milestones: MILESTONES
            .into_iter()
            .map(|at| MilestoneVm {
                at,
                reached: overall.percentage >= at,
            })
            .collect(),
        levels: pathway
            .level_names()
            .into_iter()
            .map(|level| {
                let level_progress = progress.level_progress(pathway, level);
                LevelBarVm {
                    level,
                    count_label: format!("{}/{}", level_progress.completed, level_progress.total),
                    percentage: level_progress.percentage,
                }
            })
            .collect(),
    }
}

#[must_use]
pub fn level_icon(level: Level) -> &'static str {
    match level {
        Level::Beginner => "📖",
        Level::Intermediate => "🚀",
        Level::Advanced => "🏅",
    }
}

/// CSS modifier for a level's progress bar.
#[must_use]
pub fn level_tone(level: Level) -> &'static str {
    match level {
        Level::Beginner => "tone-green",
        Level::Intermediate => "tone-yellow",
        Level::Advanced => "tone-red",
    }
}

//
// ─── STEPS ─────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepRowVm {
    pub index: usize,
    pub number: usize,
    pub title: String,
    pub completed: bool,
    pub expanded: bool,
}

/// Rows for the active level; empty when the pathway has no level open.
#[must_use]
pub fn step_rows(pathway: &Pathway, progress: &PathwayProgress, nav: PathwayNav) -> Vec<StepRowVm> {
    let Some(level) = nav.active_level() else {
        return Vec::new();
    };
    pathway
        .steps(level)
        .iter()
        .enumerate()
        .map(|(index, step)| StepRowVm {
            index,
            number: index + 1,
            title: step.title.clone(),
            completed: progress.is_step_completed(level, index),
            expanded: nav.expanded_step() == Some(index),
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionTone {
    Neutral,
    Correct,
    Incorrect,
}

impl OptionTone {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            OptionTone::Neutral => "quiz-option",
            OptionTone::Correct => "quiz-option correct",
            OptionTone::Incorrect => "quiz-option incorrect",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizOptionVm {
    pub text: String,
    pub tone: OptionTone,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub index: usize,
    pub heading: String,
    pub question: String,
    pub options: Vec<QuizOptionVm>,
    /// Shown only after a wrong pick.
    pub correct_answer: Option<String>,
    /// Shown once any option was picked.
    pub explanation: Option<String>,
}

/// Only the picked option is coloured, green when right and red when wrong.
#[must_use]
pub fn quiz_vm(
    progress: &PathwayProgress,
    level: Level,
    step: usize,
    index: usize,
    quiz: &Quiz,
) -> QuizVm {
    let status = progress.quiz_status(level, step, index, quiz);
    let picked = progress.quiz_answer(level, step, index);
    let options = quiz
        .options
        .iter()
        .map(|option| {
            let tone = match picked {
                Some(choice) if choice == option && quiz.is_correct(option) => OptionTone::Correct,
                Some(choice) if choice == option => OptionTone::Incorrect,
                _ => OptionTone::Neutral,
            };
            QuizOptionVm {
                text: option.clone(),
                tone,
            }
        })
        .collect();
    let correct_answer = match &status {
        QuizStatus::Incorrect { correct_answer } => Some(correct_answer.clone()),
        QuizStatus::Unanswered | QuizStatus::Correct => None,
    };
    let explanation = quiz
        .explanation
        .clone()
        .filter(|_| status.is_answered());

    QuizVm {
        index,
        heading: format!("Quiz {}:", index + 1),
        question: quiz.question.clone(),
        options,
        correct_answer,
        explanation,
    }
}

//
// ─── FURTHER LEARNING ──────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkVm {
    pub label: String,
    pub href: String,
    pub external: bool,
}

impl LinkVm {
    #[must_use]
    pub fn new(label: impl Into<String>, raw: &str) -> Self {
        let target = link_target(raw);
        Self {
            label: label.into(),
            href: target.href().to_string(),
            external: target.is_external(),
        }
    }

    #[must_use]
    pub fn target(&self) -> &'static str {
        if self.external { "_blank" } else { "_self" }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FurtherLearningVm {
    pub topic: String,
    pub description: String,
    pub links: Vec<LinkVm>,
}

#[must_use]
pub fn further_learning(items: &[FurtherLearning]) -> Vec<FurtherLearningVm> {
    items
        .iter()
        .map(|item| FurtherLearningVm {
            topic: item.topic.clone(),
            description: item.description.clone(),
            links: item
                .resources
                .iter()
                .map(|resource| LinkVm::new(resource.clone(), resource))
                .collect(),
        })
        .collect()
}

//
// ─── CELEBRATION ───────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq)]
pub struct ConfettiPiece {
    pub color: &'static str,
    pub top: f32,
    pub left: f32,
    pub fall: f32,
    pub rotate: f32,
    pub duration: f32,
}

impl ConfettiPiece {
    #[must_use]
    pub fn style(&self) -> String {
        format!(
            "background-color:{};top:{:.1}%;left:{:.1}%;--fall:{:.1}vh;--spin:{:.0}deg;animation-duration:{:.2}s;",
            self.color, self.top, self.left, self.fall, self.rotate, self.duration
        )
    }
}

/// One burst of confetti, colours cycling through the palette.
#[must_use]
pub fn confetti<R: Rng + ?Sized>(rng: &mut R) -> Vec<ConfettiPiece> {
    (0..CONFETTI_PIECES)
        .map(|i| ConfettiPiece {
            color: CONFETTI_PALETTE[i % CONFETTI_PALETTE.len()],
            top: rng.random_range(0.0..100.0),
            left: rng.random_range(0.0..100.0),
            fall: 100.0 + rng.random_range(0.0..50.0),
            rotate: rng.random_range(0.0..360.0),
            duration: 1.5 + rng.random_range(0.0..1.0),
        })
        .collect()
}
