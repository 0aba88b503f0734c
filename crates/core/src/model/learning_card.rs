use serde::{Deserialize, Serialize};

use crate::model::resource::Resource;

pub const NO_OVERVIEW: &str = "No Overview";
pub const NO_RELATED_TOPICS: &str = "No related topics available.";
pub const NO_SUGGESTED_QUESTIONS: &str = "No suggested questions available.";
pub const NO_NOTES: &str = "No notes available.";

/// Single-topic explainer produced by the assistant, after normalization.
///
/// Every collection is present (possibly empty) and every required string is
/// filled, so widgets can render it without further checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningCard {
    pub title: String,
    pub overview: String,
    pub difficulty: Option<String>,
    pub estimated_time: Option<String>,
    pub prerequisites: Vec<String>,
    pub key_terminologies: Vec<Terminology>,
    pub concepts: Vec<Concept>,
    pub common_mistakes: Vec<CommonMistake>,
    pub practice_exercises: Vec<PracticeExercise>,
    pub explore: Explore,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminology {
    pub title: String,
    pub description: Option<String>,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub title: String,
    pub description: String,
    pub examples: Vec<String>,
    pub code_snippets: Vec<CodeSnippet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub title: Option<String>,
    pub language: Option<String>,
    pub code: String,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonMistake {
    pub mistake: String,
    pub correction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeExercise {
    pub title: String,
    pub description: String,
    pub difficulty: Option<String>,
    pub hints: Vec<String>,
    pub solution: Option<String>,
}

/// Follow-up material. The notes are conversational text aimed at the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explore {
    pub related_topics: Vec<String>,
    pub suggested_questions: Vec<String>,
    pub notes: Vec<String>,
}

impl Default for Explore {
    fn default() -> Self {
        Self {
            related_topics: vec![NO_RELATED_TOPICS.to_string()],
            suggested_questions: vec![NO_SUGGESTED_QUESTIONS.to_string()],
            notes: vec![NO_NOTES.to_string()],
        }
    }
}
