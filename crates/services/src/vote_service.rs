use std::sync::Arc;

use storage::repository::{MessageRepository, VoteRepository};
use tutor_core::model::{ChatId, MessageId, Role, Vote};

use crate::error::VoteServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteKind {
    Up,
    Down,
}

/// Thumbs up/down feedback on assistant replies.
#[derive(Clone)]
pub struct VoteService {
    messages: Arc<dyn MessageRepository>,
    votes: Arc<dyn VoteRepository>,
}

impl VoteService {
    #[must_use]
    pub fn new(messages: Arc<dyn MessageRepository>, votes: Arc<dyn VoteRepository>) -> Self {
        Self { messages, votes }
    }

    /// Vote on an assistant message, replacing any earlier vote.
    ///
    /// # Errors
    ///
    /// Returns `VoteServiceError::MessageNotFound` if the message is not part
    /// of the chat, `NotAssistantMessage` for user messages, or storage errors.
    pub async fn vote(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        kind: VoteKind,
    ) -> Result<Vote, VoteServiceError> {
        let message = self
            .messages
            .get_message(message_id)
            .await?
            .filter(|message| message.chat_id() == chat_id)
            .ok_or(VoteServiceError::MessageNotFound)?;
        if message.role() != Role::Assistant {
            return Err(VoteServiceError::NotAssistantMessage);
        }

        let vote = Vote {
            chat_id,
            message_id,
            is_upvoted: kind == VoteKind::Up,
        };
        self.votes.upsert_vote(&vote).await?;
        tracing::debug!(chat_id = %chat_id, message_id = %message_id, up = vote.is_upvoted, "recorded vote");
        Ok(vote)
    }

    /// # Errors
    ///
    /// Returns storage errors.
    pub async fn votes(&self, chat_id: ChatId) -> Result<Vec<Vote>, VoteServiceError> {
        Ok(self.votes.list_votes(chat_id).await?)
    }
}
