use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::{ChatId, MessageId, UserId};

/// Longest email address accepted for a user.
pub const MAX_EMAIL_LEN: usize = 64;

/// Longest chat title, in characters, before truncation.
pub const MAX_TITLE_CHARS: usize = 80;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("email cannot be empty")]
    EmptyEmail,

    #[error("email is longer than {MAX_EMAIL_LEN} characters")]
    EmailTooLong,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChatError {
    #[error("chat title cannot be empty")]
    EmptyTitle,

    #[error("message content cannot be empty")]
    EmptyMessage,

    #[error("unknown message role: {0}")]
    UnknownRole(String),

    #[error("unknown chat visibility: {0}")]
    UnknownVisibility(String),
}

//
// ─── USER ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: String,
}

impl User {
    /// Creates a user with a trimmed, bounded email.
    ///
    /// # Errors
    ///
    /// Returns `UserError` if the email is blank or too long.
    pub fn new(id: UserId, email: impl Into<String>) -> Result<Self, UserError> {
        let email = email.into().trim().to_string();
        if email.is_empty() {
            return Err(UserError::EmptyEmail);
        }
        if email.chars().count() > MAX_EMAIL_LEN {
            return Err(UserError::EmailTooLong);
        }
        Ok(Self { id, email })
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

//
// ─── CHAT ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

impl Visibility {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl FromStr for Visibility {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            other => Err(ChatError::UnknownVisibility(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    id: ChatId,
    user_id: UserId,
    title: String,
    visibility: Visibility,
    created_at: DateTime<Utc>,
}

impl Chat {
    /// Creates a chat with a non-empty title.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::EmptyTitle` if the title is blank.
    pub fn new(
        id: ChatId,
        user_id: UserId,
        title: impl Into<String>,
        visibility: Visibility,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ChatError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ChatError::EmptyTitle);
        }
        Ok(Self {
            id,
            user_id,
            title,
            visibility,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> ChatId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Builds a chat title from the first user message: its first non-blank line,
/// cut to `MAX_TITLE_CHARS` with a trailing ellipsis when shortened.
#[must_use]
pub fn derive_chat_title(first_message: &str) -> Option<String> {
    let line = first_message
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())?;

    if line.chars().count() <= MAX_TITLE_CHARS {
        return Some(line.to_string());
    }

    let mut title: String = line.chars().take(MAX_TITLE_CHARS - 1).collect();
    let trimmed_len = title.trim_end().len();
    title.truncate(trimmed_len);
    title.push('…');
    Some(title)
}

//
// ─── MESSAGE ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "system" => Ok(Self::System),
            other => Err(ChatError::UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: MessageId,
    chat_id: ChatId,
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a message. User messages must carry visible text; assistant
    /// replies are stored as received.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::EmptyMessage` for a blank user message.
    pub fn new(
        id: MessageId,
        chat_id: ChatId,
        role: Role,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ChatError> {
        let content = content.into();
        if role == Role::User && content.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        Ok(Self {
            id,
            chat_id,
            role,
            content,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> MessageId {
        self.id
    }

    #[must_use]
    pub fn chat_id(&self) -> ChatId {
        self.chat_id
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//
// ─── VOTE ──────────────────────────────────────────────────────────────────────
//

/// Thumbs up/down on an assistant message. One per (chat, message).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vote {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub is_upvoted: bool,
}
