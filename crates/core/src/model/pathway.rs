use serde::{Deserialize, Serialize};

use crate::model::level::Level;
use crate::model::resource::Resource;

pub const NO_DESCRIPTION: &str = "No Description";

/// Multi-level learning roadmap produced by the assistant, after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pathway {
    pub title: String,
    pub description: String,
    pub prerequisites: Vec<String>,
    /// Levels present in the payload, in learning order, each at most once.
    pub levels: Vec<LevelSteps>,
    pub further_learning: Vec<FurtherLearning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSteps {
    pub level: Level,
    pub steps: Vec<Step>,
}

impl Pathway {
    /// Steps for a level; empty when the level is absent.
    #[must_use]
    pub fn steps(&self, level: Level) -> &[Step] {
        self.levels
            .iter()
            .find(|entry| entry.level == level)
            .map_or(&[], |entry| entry.steps.as_slice())
    }

    #[must_use]
    pub fn step(&self, level: Level, index: usize) -> Option<&Step> {
        self.steps(level).get(index)
    }

    #[must_use]
    pub fn has_level(&self, level: Level) -> bool {
        self.levels.iter().any(|entry| entry.level == level)
    }

    #[must_use]
    pub fn level_names(&self) -> Vec<Level> {
        self.levels.iter().map(|entry| entry.level).collect()
    }

    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.levels.iter().map(|entry| entry.steps.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub title: String,
    pub learning_objectives: Vec<String>,
    pub content: StepContent,
    pub key_takeaways: Vec<String>,
    pub quizzes: Vec<Quiz>,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepContent {
    pub introduction: Option<String>,
    pub explanation: String,
    pub examples: Vec<Example>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub title: Option<String>,
    pub description: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: Option<String>,
}

impl Quiz {
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.answer
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurtherLearning {
    pub topic: String,
    pub description: String,
    pub resources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(title: &str) -> Step {
        Step {
            title: title.into(),
            learning_objectives: Vec::new(),
            content: StepContent::default(),
            key_takeaways: Vec::new(),
            quizzes: Vec::new(),
            resources: Vec::new(),
        }
    }

    #[test]
    fn missing_level_has_no_steps() {
        let pathway = Pathway {
            title: "Rust".into(),
            description: "d".into(),
            prerequisites: Vec::new(),
            levels: vec![LevelSteps {
                level: Level::Beginner,
                steps: vec![step("a"), step("b")],
            }],
            further_learning: Vec::new(),
        };
        assert_eq!(pathway.steps(Level::Beginner).len(), 2);
        assert!(pathway.steps(Level::Advanced).is_empty());
        assert!(pathway.step(Level::Beginner, 2).is_none());
        assert_eq!(pathway.total_steps(), 2);
        assert_eq!(pathway.level_names(), vec![Level::Beginner]);
    }
}
