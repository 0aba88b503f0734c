use std::collections::HashMap;
use std::sync::Arc;

use storage::repository::{
    ChatRepository, MessageRepository, StorageError, UserRepository, VoteRepository,
};
use tutor_core::model::{
    Chat, ChatId, Message, MessageId, Role, User, UserId, Visibility, derive_chat_title,
};
use tutor_core::payload::{AssistantReply, classify_message};

use crate::Clock;
use crate::ai::{
    ChatCompletionClient, CompletionRequest, ModelSpec, PromptMessage, default_model,
    system_prompt,
};
use crate::error::ChatServiceError;

/// A message as the thread renders it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadEntry {
    pub message: Message,
    /// Classified content; `None` for user and system messages.
    pub reply: Option<AssistantReply>,
    /// `Some(true)` for an upvote, `Some(false)` for a downvote.
    pub vote: Option<bool>,
}

impl ThreadEntry {
    fn new(message: Message, vote: Option<bool>) -> Self {
        let reply = (message.role() == Role::Assistant)
            .then(|| classify_message(message.role(), message.content()));
        Self {
            message,
            reply,
            vote,
        }
    }
}

/// Orchestrates chats, their messages, and assistant replies.
#[derive(Clone)]
pub struct ChatService {
    clock: Clock,
    model: &'static ModelSpec,
    users: Arc<dyn UserRepository>,
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
    votes: Arc<dyn VoteRepository>,
    ai: Arc<dyn ChatCompletionClient>,
}

impl ChatService {
    #[must_use]
    pub fn new(
        clock: Clock,
        users: Arc<dyn UserRepository>,
        chats: Arc<dyn ChatRepository>,
        messages: Arc<dyn MessageRepository>,
        votes: Arc<dyn VoteRepository>,
        ai: Arc<dyn ChatCompletionClient>,
    ) -> Self {
        Self {
            clock,
            model: default_model(),
            users,
            chats,
            messages,
            votes,
            ai,
        }
    }

    /// Use `model` for replies instead of the default chat model.
    #[must_use]
    pub fn with_model(mut self, model: &'static ModelSpec) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn model(&self) -> &'static ModelSpec {
        self.model
    }

    #[must_use]
    pub fn assistant_enabled(&self) -> bool {
        self.ai.enabled()
    }

    /// Find the user with `email`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `ChatServiceError::User` for an invalid email, or storage errors.
    pub async fn ensure_user(&self, email: &str) -> Result<User, ChatServiceError> {
        let candidate = User::new(UserId::random(), email)?;
        if let Some(existing) = self.users.find_user_by_email(candidate.email()).await? {
            return Ok(existing);
        }
        match self.users.insert_user(&candidate).await {
            Ok(()) => {
                tracing::info!(user_id = %candidate.id(), "created local user");
                Ok(candidate)
            }
            // Lost a race with another insert of the same email.
            Err(StorageError::Conflict) => self
                .users
                .find_user_by_email(candidate.email())
                .await?
                .ok_or(ChatServiceError::Storage(StorageError::Conflict)),
            Err(err) => Err(err.into()),
        }
    }

    /// Create a chat titled after `first_message` and store that message.
    ///
    /// No reply is requested; call `request_reply` next.
    ///
    /// # Errors
    ///
    /// Returns `ChatServiceError::Chat` if the message is blank, or storage errors.
    pub async fn start_chat(
        &self,
        user: &User,
        first_message: &str,
        visibility: Visibility,
    ) -> Result<(Chat, Message), ChatServiceError> {
        let title = derive_chat_title(first_message)
            .ok_or(tutor_core::model::ChatError::EmptyMessage)?;
        let now = self.clock.now();
        let chat = Chat::new(ChatId::random(), user.id(), title, visibility, now)?;
        let message = Message::new(MessageId::random(), chat.id(), Role::User, first_message, now)?;

        self.chats.insert_chat(&chat).await?;
        self.messages.append_message(&message).await?;
        tracing::info!(chat_id = %chat.id(), "started chat");
        Ok((chat, message))
    }

    /// Store a user message, then ask the assistant to answer it.
    ///
    /// The user message stays stored when the assistant fails.
    ///
    /// # Errors
    ///
    /// Returns `ChatServiceError` if the chat is missing, the text is blank,
    /// storage fails, or the assistant request fails.
    pub async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
    ) -> Result<ThreadEntry, ChatServiceError> {
        self.post_message(chat_id, text).await?;
        self.request_reply(chat_id).await
    }

    /// Store a user message without asking for a reply.
    ///
    /// # Errors
    ///
    /// Returns `ChatServiceError` if the chat is missing, the text is blank,
    /// or storage fails.
    pub async fn post_message(
        &self,
        chat_id: ChatId,
        text: &str,
    ) -> Result<ThreadEntry, ChatServiceError> {
        self.require_chat(chat_id).await?;
        let message = Message::new(
            MessageId::random(),
            chat_id,
            Role::User,
            text,
            self.clock.now(),
        )?;
        self.messages.append_message(&message).await?;
        Ok(ThreadEntry::new(message, None))
    }

    /// Ask the assistant to answer the chat's transcript and store the reply.
    ///
    /// # Errors
    ///
    /// Returns `ChatServiceError` if the chat is missing, storage fails, or the
    /// assistant request fails.
    pub async fn request_reply(&self, chat_id: ChatId) -> Result<ThreadEntry, ChatServiceError> {
        self.require_chat(chat_id).await?;
        let history = self.messages.list_messages(chat_id).await?;
        let request = CompletionRequest {
            model: self.model,
            system: system_prompt(self.model.id),
            messages: history
                .iter()
                .filter(|message| message.role() != Role::System)
                .map(|message| PromptMessage {
                    role: message.role(),
                    content: message.content().to_string(),
                })
                .collect(),
        };

        let completion = self.ai.complete(request).await.inspect_err(|err| {
            tracing::warn!(chat_id = %chat_id, error = %err, "assistant reply failed");
        })?;
        if let Some(reasoning) = &completion.reasoning {
            tracing::debug!(chat_id = %chat_id, len = reasoning.len(), "dropped model reasoning");
        }

        let reply = Message::new(
            MessageId::random(),
            chat_id,
            Role::Assistant,
            completion.text,
            self.clock.now(),
        )?;
        self.messages.append_message(&reply).await?;
        Ok(ThreadEntry::new(reply, None))
    }

    /// The chat's messages in order, classified and joined with their votes.
    ///
    /// # Errors
    ///
    /// Returns `ChatServiceError::ChatNotFound` or storage errors.
    pub async fn thread(&self, chat_id: ChatId) -> Result<Vec<ThreadEntry>, ChatServiceError> {
        self.require_chat(chat_id).await?;
        let messages = self.messages.list_messages(chat_id).await?;
        let votes: HashMap<MessageId, bool> = self
            .votes
            .list_votes(chat_id)
            .await?
            .into_iter()
            .map(|vote| (vote.message_id, vote.is_upvoted))
            .collect();

        Ok(messages
            .into_iter()
            .map(|message| {
                let vote = votes.get(&message.id()).copied();
                ThreadEntry::new(message, vote)
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns `ChatServiceError::ChatNotFound` or storage errors.
    pub async fn get_chat(&self, chat_id: ChatId) -> Result<Chat, ChatServiceError> {
        self.require_chat(chat_id).await
    }

    /// The user's chats, newest first.
    ///
    /// # Errors
    ///
    /// Returns storage errors.
    pub async fn list_chats(&self, user: &User) -> Result<Vec<Chat>, ChatServiceError> {
        Ok(self.chats.list_chats(user.id()).await?)
    }

    /// Delete a chat with its messages and votes.
    ///
    /// # Errors
    ///
    /// Returns `ChatServiceError::ChatNotFound` or storage errors.
    pub async fn delete_chat(&self, chat_id: ChatId) -> Result<(), ChatServiceError> {
        match self.chats.delete_chat(chat_id).await {
            Ok(()) => {
                tracing::info!(chat_id = %chat_id, "deleted chat");
                Ok(())
            }
            Err(StorageError::NotFound) => Err(ChatServiceError::ChatNotFound),
            Err(err) => Err(err.into()),
        }
    }

    async fn require_chat(&self, chat_id: ChatId) -> Result<Chat, ChatServiceError> {
        self.chats
            .get_chat(chat_id)
            .await?
            .ok_or(ChatServiceError::ChatNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ScriptedClient;
    use storage::repository::Storage;
    use tutor_core::time::fixed_now;

    fn service(client: ScriptedClient) -> ChatService {
        let storage = Storage::in_memory();
        ChatService::new(
            Clock::fixed(fixed_now()),
            storage.users,
            storage.chats,
            storage.messages,
            storage.votes,
            Arc::new(client),
        )
    }

    #[tokio::test]
    async fn ensure_user_is_idempotent() {
        let chat = service(ScriptedClient::default());
        let first = chat.ensure_user("ada@example.com").await.unwrap();
        let second = chat.ensure_user(" ada@example.com ").await.unwrap();
        assert_eq!(first.id(), second.id());
    }

    #[tokio::test]
    async fn blank_first_message_is_rejected() {
        let chat = service(ScriptedClient::default());
        let user = chat.ensure_user("ada@example.com").await.unwrap();
        let err = chat
            .start_chat(&user, "   ", Visibility::Private)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatServiceError::Chat(_)));
        assert!(chat.list_chats(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_reply_keeps_user_message() {
        let chat = service(ScriptedClient::default());
        let user = chat.ensure_user("ada@example.com").await.unwrap();
        let (started, _) = chat
            .start_chat(&user, "Hello", Visibility::Private)
            .await
            .unwrap();

        let err = chat.send_message(started.id(), "Anyone?").await.unwrap_err();
        assert!(matches!(err, ChatServiceError::Ai(_)));

        let thread = chat.thread(started.id()).await.unwrap();
        assert_eq!(thread.len(), 2);
        assert!(thread.iter().all(|entry| entry.reply.is_none()));
    }

    #[tokio::test]
    async fn missing_chat_is_reported() {
        let chat = service(ScriptedClient::new(["hi"]));
        let err = chat.send_message(ChatId::random(), "hi").await.unwrap_err();
        assert!(matches!(err, ChatServiceError::ChatNotFound));
        let err = chat.delete_chat(ChatId::random()).await.unwrap_err();
        assert!(matches!(err, ChatServiceError::ChatNotFound));
    }
}
