//! Turns raw assistant text into a renderable reply.
//!
//! The model is asked to answer conceptual questions with a `learningCard`
//! JSON document and roadmap requests with a `learningPathway` document, and
//! to answer everything else in prose. It does not always comply: JSON shows
//! up inside code fences, wrapped in a `data` envelope, prefixed by a sentence,
//! or with fields of the wrong type. Classification never fails; anything
//! that cannot be read as structured content is shown as plain text.

mod card;
mod lenient;
mod pathway;

use serde_json::Value;

use crate::model::{LearningCard, Pathway, Role};

const PATHWAY_KEY: &str = "learningPathway";
const CARD_KEY: &str = "learningCard";
const ENVELOPE_KEY: &str = "data";

/// What an assistant message should render as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantReply {
    Pathway(Box<Pathway>),
    Card(Box<LearningCard>),
    Plain(String),
}

impl AssistantReply {
    #[must_use]
    pub fn is_structured(&self) -> bool {
        !matches!(self, AssistantReply::Plain(_))
    }

    #[must_use]
    pub fn as_pathway(&self) -> Option<&Pathway> {
        match self {
            AssistantReply::Pathway(pathway) => Some(pathway.as_ref()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_card(&self) -> Option<&LearningCard> {
        match self {
            AssistantReply::Card(card) => Some(card.as_ref()),
            _ => None,
        }
    }
}

/// Classifies a stored message. Only assistant messages are inspected.
#[must_use]
pub fn classify_message(role: Role, content: &str) -> AssistantReply {
    match role {
        Role::Assistant => classify_reply(content),
        Role::User | Role::System => AssistantReply::Plain(content.to_string()),
    }
}

/// Classifies assistant text. A pathway wins over a card when both exist.
#[must_use]
pub fn classify_reply(content: &str) -> AssistantReply {
    if content.trim().is_empty() {
        return AssistantReply::Plain(content.to_string());
    }

    let cleaned = strip_code_fences(content);
    let Some(root) = parse_document(&cleaned) else {
        tracing::debug!(len = content.len(), "assistant reply is not JSON; rendering as text");
        return AssistantReply::Plain(content.to_string());
    };

    if let Some(obj) = section(&root, PATHWAY_KEY) {
        return AssistantReply::Pathway(Box::new(pathway::pathway(obj)));
    }
    if let Some(obj) = section(&root, CARD_KEY) {
        return AssistantReply::Card(Box::new(card::learning_card(obj)));
    }

    tracing::debug!("assistant JSON carries neither a card nor a pathway");
    AssistantReply::Plain(content.to_string())
}

/// Removes every "```json" and "```" marker and trims the result.
#[must_use]
pub fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

fn parse_document(cleaned: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return Some(value);
    }

    // Prose before or after the document: retry on the outermost braces.
    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&cleaned[start..=end]).ok()
}

fn section<'a>(root: &'a Value, key: &str) -> Option<&'a lenient::Object> {
    root.get(key)
        .and_then(Value::as_object)
        .or_else(|| root.get(ENVELOPE_KEY)?.get(key)?.as_object())
}
