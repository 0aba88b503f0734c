use services::ThreadEntry;
use tutor_core::model::{LearningCard, MessageId, Pathway, Role};
use tutor_core::payload::AssistantReply;

use crate::vm::markdown_vm::{markdown_to_html, normalize_markdown};

pub const GREETING_TITLE: &str = "Hello there!";
pub const GREETING_SUBTITLE: &str = "What would you like to learn today?";
pub const THINKING_LABEL: &str = "Thinking...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageBody {
    Pathway(Box<Pathway>),
    Card(Box<LearningCard>),
    /// Sanitized HTML plus the text copied by the copy button.
    Markdown { html: String, copy_text: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageVm {
    pub id: MessageId,
    pub role: Role,
    pub body: MessageBody,
    pub vote: Option<bool>,
}

impl MessageVm {
    #[must_use]
    pub fn can_vote(&self) -> bool {
        self.role == Role::Assistant
    }

    #[must_use]
    pub fn role_class(&self) -> &'static str {
        match self.role {
            Role::User => "message user",
            Role::Assistant => "message assistant",
            Role::System => "message system",
        }
    }
}

impl From<&ThreadEntry> for MessageVm {
    fn from(entry: &ThreadEntry) -> Self {
        let content = entry.message.content();
        let body = match &entry.reply {
            Some(AssistantReply::Pathway(pathway)) => MessageBody::Pathway(pathway.clone()),
            Some(AssistantReply::Card(card)) => MessageBody::Card(card.clone()),
            Some(AssistantReply::Plain(_)) | None => MessageBody::Markdown {
                html: markdown_to_html(content),
                copy_text: normalize_markdown(content),
            },
        };
        Self {
            id: entry.message.id(),
            role: entry.message.role(),
            body,
            vote: entry.vote,
        }
    }
}

#[must_use]
pub fn map_thread(entries: &[ThreadEntry]) -> Vec<MessageVm> {
    entries.iter().map(MessageVm::from).collect()
}

/// The thinking row shows while a reply is pending for a trailing user message.
#[must_use]
pub fn show_thinking(loading: bool, messages: &[MessageVm]) -> bool {
    loading && messages.last().is_some_and(|last| last.role == Role::User)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::model::{ChatId, Message};
    use tutor_core::payload::classify_message;
    use tutor_core::time::fixed_now;

    fn entry(role: Role, content: &str) -> ThreadEntry {
        let message = Message::new(MessageId::random(), ChatId::random(), role, content, fixed_now())
            .unwrap();
        let reply = (role == Role::Assistant).then(|| classify_message(role, content));
        ThreadEntry {
            message,
            reply,
            vote: None,
        }
    }

    #[test]
    fn replies_map_to_widgets() {
        let entries = vec![
            entry(Role::User, "**hi**"),
            entry(Role::Assistant, r#"{"learningCard": {"title": "HTML"}}"#),
            entry(Role::Assistant, r#"{"learningPathway": {"title": "Web"}}"#),
        ];
        let vms = map_thread(&entries);
        match &vms[0].body {
            MessageBody::Markdown { html, copy_text } => {
                assert!(html.contains("<strong>hi</strong>"));
                assert_eq!(copy_text, "**hi**\n");
            }
            other => panic!("expected markdown, got {other:?}"),
        }
        assert!(matches!(vms[1].body, MessageBody::Card(_)));
        assert!(matches!(vms[2].body, MessageBody::Pathway(_)));
        assert!(!vms[0].can_vote());
        assert!(vms[1].can_vote());
    }

    #[test]
    fn thinking_only_after_a_user_message() {
        let user = map_thread(&[entry(Role::User, "hello")]);
        let answered = map_thread(&[entry(Role::User, "hello"), entry(Role::Assistant, "hi")]);
        assert!(show_thinking(true, &user));
        assert!(!show_thinking(false, &user));
        assert!(!show_thinking(true, &answered));
        assert!(!show_thinking(true, &[]));
    }
}
