//! Learner progress through a learning pathway.
//!
//! Tracks which steps have been completed per level and which option was
//! picked for every quiz, derives per-level and overall percentages, and
//! converts to and from the two JSON documents kept in local storage.
//!
//! Completed indices and quiz answers are kept per level. Stored indices that
//! no longer exist in the pathway are ignored when computing progress, so a
//! regenerated or shorter pathway never reports more than 100%.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use thiserror::Error;

use crate::model::{Level, Pathway, Quiz};

/// Local-storage key prefix for completed steps.
pub const PROGRESS_KEY: &str = "learningPathwayProgress";
/// Local-storage key prefix for quiz answers.
pub const QUIZ_ANSWERS_KEY: &str = "learningPathwayQuizAnswers";

/// Percentages at which the tracker shows a milestone marker.
pub const MILESTONES: [u8; 3] = [25, 50, 75];

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("pathway has no {0} level")]
    UnknownLevel(Level),

    #[error("{level} has {len} steps; step {index} does not exist")]
    StepOutOfRange {
        level: Level,
        index: usize,
        len: usize,
    },

    #[error("step {step} has {len} quizzes; quiz {index} does not exist")]
    QuizOutOfRange {
        step: usize,
        index: usize,
        len: usize,
    },

    #[error("\"{0}\" is not one of the quiz options")]
    UnknownOption(String),

    #[error("failed to encode progress: {0}")]
    Encode(String),
}

//
// ─── RESULT TYPES ──────────────────────────────────────────────────────────────
//

/// Outcome of marking a step complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// First time this step was completed; worth celebrating.
    Newly,
    Already,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizStatus {
    Unanswered,
    Correct,
    Incorrect { correct_answer: String },
}

impl QuizStatus {
    #[must_use]
    pub fn is_answered(&self) -> bool {
        !matches!(self, QuizStatus::Unanswered)
    }
}

/// Completed/total counts with a rounded percentage in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

impl Progress {
    #[must_use]
    pub fn new(completed: usize, total: usize) -> Self {
        let completed = completed.min(total);
        Self {
            completed,
            total,
            percentage: percentage(completed, total),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Rounds `completed / total * 100` half up; 0 when there is nothing to do.
#[must_use]
pub fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u128;
    let total = total as u128;
    let rounded = (completed * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

/// Milestones at or below `percentage`, ascending.
#[must_use]
pub fn milestones_reached(percentage: u8) -> Vec<u8> {
    MILESTONES
        .into_iter()
        .filter(|milestone| percentage >= *milestone)
        .collect()
}

/// The two local-storage keys for one pathway.
#[must_use]
pub fn storage_keys(scope: &str) -> (String, String) {
    (
        format!("{PROGRESS_KEY}:{scope}"),
        format!("{QUIZ_ANSWERS_KEY}:{scope}"),
    )
}

/// Serialized form of `PathwayProgress`, one JSON document per storage key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProgress {
    pub completed: String,
    pub answers: String,
}

/// How `PathwayProgress::restore` went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restored {
    /// Nothing was stored.
    Fresh,
    Loaded,
    /// Stored data could not be read; state starts empty and storage should be cleared.
    Corrupted,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

type Answers = BTreeMap<usize, BTreeMap<usize, String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathwayProgress {
    completed: BTreeMap<Level, BTreeSet<usize>>,
    answers: BTreeMap<Level, Answers>,
}

impl PathwayProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.values().all(BTreeSet::is_empty)
            && self.answers.values().all(BTreeMap::is_empty)
    }

    /// Marks a step as completed. Completing it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the level or step does not exist in `pathway`.
    pub fn mark_step_completed(
        &mut self,
        pathway: &Pathway,
        level: Level,
        index: usize,
    ) -> Result<Completion, ProgressError> {
        check_step(pathway, level, index)?;
        let inserted = self.completed.entry(level).or_default().insert(index);
        Ok(if inserted {
            Completion::Newly
        } else {
            Completion::Already
        })
    }

    #[must_use]
    pub fn is_step_completed(&self, level: Level, index: usize) -> bool {
        self.completed
            .get(&level)
            .is_some_and(|steps| steps.contains(&index))
    }

    /// Completed step indices for a level, ascending.
    pub fn completed_steps(&self, level: Level) -> impl Iterator<Item = usize> + '_ {
        self.completed
            .get(&level)
            .into_iter()
            .flat_map(|steps| steps.iter().copied())
    }

    /// Records the learner's choice for a quiz, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the step or quiz does not exist, or if
    /// `option` is not one of the quiz options.
    pub fn select_quiz_answer(
        &mut self,
        pathway: &Pathway,
        level: Level,
        step: usize,
        quiz: usize,
        option: impl Into<String>,
    ) -> Result<QuizStatus, ProgressError> {
        let target = check_quiz(pathway, level, step, quiz)?;
        let option = option.into();
        if !target.has_option(&option) {
            return Err(ProgressError::UnknownOption(option));
        }

        self.answers
            .entry(level)
            .or_default()
            .entry(step)
            .or_default()
            .insert(quiz, option);
        Ok(self.quiz_status(level, step, quiz, target))
    }

    #[must_use]
    pub fn quiz_answer(&self, level: Level, step: usize, quiz: usize) -> Option<&str> {
        self.answers
            .get(&level)?
            .get(&step)?
            .get(&quiz)
            .map(String::as_str)
    }

    #[must_use]
    pub fn quiz_status(&self, level: Level, step: usize, index: usize, quiz: &Quiz) -> QuizStatus {
        match self.quiz_answer(level, step, index) {
            None => QuizStatus::Unanswered,
            Some(answer) if quiz.is_correct(answer) => QuizStatus::Correct,
            Some(_) => QuizStatus::Incorrect {
                correct_answer: quiz.answer.clone(),
            },
        }
    }

    /// Progress across every level present in `pathway`.
    #[must_use]
    pub fn overall(&self, pathway: &Pathway) -> Progress {
        let (completed, total) = pathway
            .levels
            .iter()
            .map(|entry| self.counts(entry.level, entry.steps.len()))
            .fold((0, 0), |(done, all), (d, a)| (done + d, all + a));
        Progress::new(completed, total)
    }

    /// Progress within one level; zero when the level is absent.
    #[must_use]
    pub fn level_progress(&self, pathway: &Pathway, level: Level) -> Progress {
        let (completed, total) = self.counts(level, pathway.steps(level).len());
        Progress::new(completed, total)
    }

    fn counts(&self, level: Level, len: usize) -> (usize, usize) {
        let completed = self
            .completed
            .get(&level)
            .map_or(0, |steps| steps.range(..len).count());
        (completed, len)
    }

    pub fn reset(&mut self) {
        self.completed.clear();
        self.answers.clear();
    }

    /// Encodes both storage documents.
    ///
    /// Completed steps: `{"Beginner":[0,2]}`.
    /// Quiz answers: `{"Beginner":{"0":{"1":"option"}}}`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Encode` if serialization fails.
    pub fn to_stored(&self) -> Result<StoredProgress, ProgressError> {
        let completed: BTreeMap<&str, Vec<usize>> = self
            .completed
            .iter()
            .filter(|(_, steps)| !steps.is_empty())
            .map(|(level, steps)| (level.as_str(), steps.iter().copied().collect()))
            .collect();
        let answers: BTreeMap<&str, &Answers> = self
            .answers
            .iter()
            .filter(|(_, answers)| !answers.is_empty())
            .map(|(level, answers)| (level.as_str(), answers))
            .collect();

        Ok(StoredProgress {
            completed: serde_json::to_string(&completed)
                .map_err(|err| ProgressError::Encode(err.to_string()))?,
            answers: serde_json::to_string(&answers)
                .map_err(|err| ProgressError::Encode(err.to_string()))?,
        })
    }

    /// Rebuilds progress from the stored documents.
    ///
    /// A level whose value is not an array restores as empty; entries that are
    /// not indices are skipped; unknown levels are dropped. Documents that are
    /// not JSON objects make the whole restore `Corrupted`.
    #[must_use]
    pub fn restore(completed: Option<&str>, answers: Option<&str>) -> (Self, Restored) {
        if completed.is_none() && answers.is_none() {
            return (Self::default(), Restored::Fresh);
        }

        let parsed = (
            completed.map_or_else(|| Some(BTreeMap::new()), decode_completed),
            answers.map_or_else(|| Some(BTreeMap::new()), decode_answers),
        );
        match parsed {
            (Some(completed), Some(answers)) => (Self { completed, answers }, Restored::Loaded),
            _ => (Self::default(), Restored::Corrupted),
        }
    }
}

fn check_step(pathway: &Pathway, level: Level, index: usize) -> Result<(), ProgressError> {
    if !pathway.has_level(level) {
        return Err(ProgressError::UnknownLevel(level));
    }
    let len = pathway.steps(level).len();
    if index >= len {
        return Err(ProgressError::StepOutOfRange { level, index, len });
    }
    Ok(())
}

fn check_quiz(
    pathway: &Pathway,
    level: Level,
    step: usize,
    quiz: usize,
) -> Result<&Quiz, ProgressError> {
    check_step(pathway, level, step)?;
    let quizzes = &pathway.steps(level)[step].quizzes;
    quizzes.get(quiz).ok_or(ProgressError::QuizOutOfRange {
        step,
        index: quiz,
        len: quizzes.len(),
    })
}

fn decode_object(raw: &str) -> Option<serde_json::Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn decode_index(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|raw| usize::try_from(raw).ok())
}

fn decode_key(key: &str) -> Option<usize> {
    key.trim().parse().ok()
}

fn decode_completed(raw: &str) -> Option<BTreeMap<Level, BTreeSet<usize>>> {
    let map = decode_object(raw)?;
    let mut completed = BTreeMap::new();
    for (key, value) in &map {
        let Some(level) = Level::from_key(key) else {
            continue;
        };
        let steps: BTreeSet<usize> = match value {
            Value::Array(items) => items.iter().filter_map(decode_index).collect(),
            _ => BTreeSet::new(),
        };
        completed.entry(level).or_insert_with(BTreeSet::new).extend(steps);
    }
    Some(completed)
}

fn decode_answers(raw: &str) -> Option<BTreeMap<Level, Answers>> {
    let map = decode_object(raw)?;
    let mut answers: BTreeMap<Level, Answers> = BTreeMap::new();
    for (key, steps) in &map {
        let (Some(level), Value::Object(steps)) = (Level::from_key(key), steps) else {
            continue;
        };
        for (step_key, quizzes) in steps {
            let (Some(step), Value::Object(quizzes)) = (decode_key(step_key), quizzes) else {
                continue;
            };
            for (quiz_key, choice) in quizzes {
                let (Some(quiz), Value::String(choice)) = (decode_key(quiz_key), choice) else {
                    continue;
                };
                answers
                    .entry(level)
                    .or_default()
                    .entry(step)
                    .or_default()
                    .insert(quiz, choice.clone());
            }
        }
    }
    Some(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LevelSteps, Step, StepContent};

    fn quiz(answer: &str) -> Quiz {
        Quiz {
            question: "Pick one".into(),
            options: vec!["A".into(), "B".into(), "C".into()],
            answer: answer.into(),
            explanation: Some("Because".into()),
        }
    }

    fn step(title: &str, quizzes: Vec<Quiz>) -> Step {
        Step {
            title: title.into(),
            learning_objectives: Vec::new(),
            content: StepContent::default(),
            key_takeaways: Vec::new(),
            quizzes,
            resources: Vec::new(),
        }
    }

    fn pathway(beginner: usize, intermediate: usize, advanced: usize) -> Pathway {
        let steps = |n: usize, prefix: &str| -> Vec<Step> {
            (0..n)
                .map(|i| step(&format!("{prefix} {i}"), vec![quiz("B"), quiz("C")]))
                .collect()
        };
        Pathway {
            title: "Web".into(),
            description: "d".into(),
            prerequisites: Vec::new(),
            levels: vec![
                LevelSteps {
                    level: Level::Beginner,
                    steps: steps(beginner, "b"),
                },
                LevelSteps {
                    level: Level::Intermediate,
                    steps: steps(intermediate, "i"),
                },
                LevelSteps {
                    level: Level::Advanced,
                    steps: steps(advanced, "a"),
                },
            ],
            further_learning: Vec::new(),
        }
    }

    #[test]
    fn percentages_round_half_up() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 5), 100);
        assert_eq!(percentage(9, 5), 100);
    }

    #[test]
    fn milestones_follow_percentage() {
        assert!(milestones_reached(24).is_empty());
        assert_eq!(milestones_reached(50), vec![25, 50]);
        assert_eq!(milestones_reached(100), vec![25, 50, 75]);
    }

    #[test]
    fn completing_a_step_is_idempotent() {
        let pathway = pathway(3, 0, 0);
        let mut progress = PathwayProgress::new();

        let first = progress.mark_step_completed(&pathway, Level::Beginner, 1);
        let second = progress.mark_step_completed(&pathway, Level::Beginner, 1);

        assert_eq!(first, Ok(Completion::Newly));
        assert_eq!(second, Ok(Completion::Already));
        assert!(progress.is_step_completed(Level::Beginner, 1));
        assert!(!progress.is_step_completed(Level::Intermediate, 1));
        assert_eq!(progress.overall(&pathway), Progress::new(1, 3));
    }

    #[test]
    fn completion_rejects_missing_steps() {
        let mut pathway = pathway(2, 0, 0);
        pathway.levels.retain(|entry| entry.level != Level::Advanced);
        let mut progress = PathwayProgress::new();

        assert_eq!(
            progress.mark_step_completed(&pathway, Level::Beginner, 2),
            Err(ProgressError::StepOutOfRange {
                level: Level::Beginner,
                index: 2,
                len: 2
            })
        );
        assert_eq!(
            progress.mark_step_completed(&pathway, Level::Advanced, 0),
            Err(ProgressError::UnknownLevel(Level::Advanced))
        );
        assert!(progress.is_empty());
    }

    #[test]
    fn overall_and_level_progress_aggregate_across_levels() {
        let pathway = pathway(2, 3, 1);
        let mut progress = PathwayProgress::new();
        progress.mark_step_completed(&pathway, Level::Beginner, 0).unwrap();
        progress.mark_step_completed(&pathway, Level::Beginner, 1).unwrap();
        progress.mark_step_completed(&pathway, Level::Intermediate, 2).unwrap();

        let overall = progress.overall(&pathway);
        assert_eq!((overall.completed, overall.total, overall.percentage), (3, 6, 50));

        let beginner = progress.level_progress(&pathway, Level::Beginner);
        assert!(beginner.is_complete());
        assert_eq!(beginner.percentage, 100);

        let intermediate = progress.level_progress(&pathway, Level::Intermediate);
        assert_eq!((intermediate.completed, intermediate.percentage), (1, 33));

        let advanced = progress.level_progress(&pathway, Level::Advanced);
        assert_eq!(advanced, Progress::new(0, 1));
    }

    #[test]
    fn stale_indices_do_not_inflate_progress() {
        let longer = pathway(4, 0, 0);
        let shorter = pathway(2, 0, 0);
        let mut progress = PathwayProgress::new();
        for index in 0..4 {
            progress.mark_step_completed(&longer, Level::Beginner, index).unwrap();
        }
        let overall = progress.overall(&shorter);
        assert_eq!((overall.completed, overall.total, overall.percentage), (2, 2, 100));
    }

    #[test]
    fn quiz_answers_are_per_level_and_overwritable() {
        let pathway = pathway(1, 1, 0);
        let mut progress = PathwayProgress::new();

        let status = progress
            .select_quiz_answer(&pathway, Level::Beginner, 0, 0, "A")
            .unwrap();
        assert_eq!(
            status,
            QuizStatus::Incorrect {
                correct_answer: "B".into()
            }
        );
        let status = progress
            .select_quiz_answer(&pathway, Level::Beginner, 0, 0, "B")
            .unwrap();
        assert_eq!(status, QuizStatus::Correct);

        assert_eq!(progress.quiz_answer(Level::Beginner, 0, 0), Some("B"));
        assert_eq!(progress.quiz_answer(Level::Intermediate, 0, 0), None);
        assert_eq!(
            progress.quiz_status(Level::Beginner, 0, 1, &pathway.steps(Level::Beginner)[0].quizzes[1]),
            QuizStatus::Unanswered
        );
    }

    #[test]
    fn quiz_answer_must_be_an_option() {
        let pathway = pathway(1, 0, 0);
        let mut progress = PathwayProgress::new();
        assert_eq!(
            progress.select_quiz_answer(&pathway, Level::Beginner, 0, 0, "Z"),
            Err(ProgressError::UnknownOption("Z".into()))
        );
        assert_eq!(
            progress.select_quiz_answer(&pathway, Level::Beginner, 0, 5, "A"),
            Err(ProgressError::QuizOutOfRange {
                step: 0,
                index: 5,
                len: 2
            })
        );
    }

    #[test]
    fn reset_clears_everything() {
        let pathway = pathway(1, 0, 0);
        let mut progress = PathwayProgress::new();
        progress.mark_step_completed(&pathway, Level::Beginner, 0).unwrap();
        progress
            .select_quiz_answer(&pathway, Level::Beginner, 0, 0, "A")
            .unwrap();
        progress.reset();
        assert!(progress.is_empty());
        assert_eq!(progress.overall(&pathway).percentage, 0);
    }

    #[test]
    fn stored_documents_use_level_names() {
        let pathway = pathway(3, 1, 0);
        let mut progress = PathwayProgress::new();
        progress.mark_step_completed(&pathway, Level::Beginner, 2).unwrap();
        progress.mark_step_completed(&pathway, Level::Beginner, 0).unwrap();
        progress
            .select_quiz_answer(&pathway, Level::Intermediate, 0, 1, "C")
            .unwrap();

        let stored = progress.to_stored().unwrap();
        assert_eq!(stored.completed, r#"{"Beginner":[0,2]}"#);
        assert_eq!(stored.answers, r#"{"Intermediate":{"0":{"1":"C"}}}"#);

        let (restored, status) =
            PathwayProgress::restore(Some(&stored.completed), Some(&stored.answers));
        assert_eq!(status, Restored::Loaded);
        assert_eq!(restored, progress);
    }

    #[test]
    fn restore_tolerates_odd_level_values() {
        let (progress, status) = PathwayProgress::restore(
            Some(r#"{"Beginner": "oops", "Intermediate": [0, "x", -1, 2], "Expert": [1]}"#),
            None,
        );
        assert_eq!(status, Restored::Loaded);
        assert_eq!(progress.completed_steps(Level::Beginner).count(), 0);
        assert_eq!(
            progress.completed_steps(Level::Intermediate).collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[test]
    fn restore_reports_corruption() {
        let (progress, status) = PathwayProgress::restore(Some("{not json"), Some("{}"));
        assert_eq!(status, Restored::Corrupted);
        assert!(progress.is_empty());

        let (_, status) = PathwayProgress::restore(Some("{}"), Some("[1,2]"));
        assert_eq!(status, Restored::Corrupted);

        let (_, status) = PathwayProgress::restore(None, None);
        assert_eq!(status, Restored::Fresh);
    }

    #[test]
    fn storage_keys_are_scoped() {
        let (progress, answers) = storage_keys("abc");
        assert_eq!(progress, "learningPathwayProgress:abc");
        assert_eq!(answers, "learningPathwayQuizAnswers:abc");
    }
}
