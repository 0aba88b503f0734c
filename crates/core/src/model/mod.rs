mod chat;
mod ids;
mod learning_card;
mod level;
mod pathway;
mod resource;

pub use chat::{
    Chat, ChatError, Message, Role, User, UserError, Visibility, Vote, derive_chat_title,
    MAX_EMAIL_LEN, MAX_TITLE_CHARS,
};
pub use ids::{ChatId, MessageId, ParseIdError, RoadmapId, RoadmapStepId, UserId};
pub use learning_card::{
    CodeSnippet, CommonMistake, Concept, Explore, LearningCard, PracticeExercise, Terminology,
    NO_NOTES, NO_OVERVIEW, NO_RELATED_TOPICS, NO_SUGGESTED_QUESTIONS,
};
pub use level::{Level, ParseLevelError};
pub use pathway::{
    Example, FurtherLearning, LevelSteps, Pathway, Quiz, Step, StepContent, NO_DESCRIPTION,
};
pub use resource::{LinkTarget, Resource, link_target};

/// Fallback title for cards and pathways that arrive without one.
pub const NO_TITLE: &str = "No Title";
