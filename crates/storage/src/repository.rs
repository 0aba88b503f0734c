use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tutor_core::model::{
    Chat, ChatId, Message, MessageId, RoadmapId, RoadmapStepId, User, UserId, Vote,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── RECORDS ───────────────────────────────────────────────────────────────────
//

/// A roadmap about to be saved, with its steps in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoadmapRecord {
    pub title: String,
    pub description: Option<String>,
    pub steps: Vec<NewRoadmapStep>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoadmapStep {
    pub title: String,
    pub description: Option<String>,
}

/// Persisted roadmap without its steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapSummary {
    pub id: RoadmapId,
    pub title: String,
    pub description: Option<String>,
    pub step_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapRecord {
    pub id: RoadmapId,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Ordered by `position`, starting at 0.
    pub steps: Vec<RoadmapStepRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapStepRecord {
    pub id: RoadmapStepId,
    pub position: u32,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id or email is already taken.
    async fn insert_user(&self, user: &User) -> Result<(), StorageError>;

    /// Look a user up by exact email.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;
}

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Persist a new chat.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id exists, or other storage errors.
    async fn insert_chat(&self, chat: &Chat) -> Result<(), StorageError>;

    /// Fetch a chat by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_chat(&self, id: ChatId) -> Result<Option<Chat>, StorageError>;

    /// Chats owned by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_chats(&self, user_id: UserId) -> Result<Vec<Chat>, StorageError>;

    /// Delete a chat together with its messages and votes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the chat does not exist.
    async fn delete_chat(&self, id: ChatId) -> Result<(), StorageError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Append a message to its chat.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the chat does not exist,
    /// `StorageError::Conflict` on a duplicate id.
    async fn append_message(&self, message: &Message) -> Result<(), StorageError>;

    /// Messages of a chat in the order they were appended.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_messages(&self, chat_id: ChatId) -> Result<Vec<Message>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_message(&self, id: MessageId) -> Result<Option<Message>, StorageError>;
}

#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Record a vote, replacing any earlier vote on the same message.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the vote cannot be stored.
    async fn upsert_vote(&self, vote: &Vote) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_votes(&self, chat_id: ChatId) -> Result<Vec<Vote>, StorageError>;
}

#[async_trait]
pub trait RoadmapRepository: Send + Sync {
    /// Save a roadmap and its steps atomically.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the roadmap cannot be stored.
    async fn insert_roadmap(&self, roadmap: NewRoadmapRecord) -> Result<RoadmapId, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_roadmap(&self, id: RoadmapId) -> Result<Option<RoadmapRecord>, StorageError>;

    /// All roadmaps, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_roadmaps(&self) -> Result<Vec<RoadmapSummary>, StorageError>;
}

/// String key/value storage for client-side state such as pathway progress.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write several entries at once; either all are stored or none.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entries cannot be stored.
    async fn set_many(&self, entries: &[(String, String)]) -> Result<(), StorageError>;

    /// Remove keys; missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn remove_many(&self, keys: &[String]) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY BACKEND ─────────────────────────────────────────────────────────
//

#[derive(Default)]
struct RoadmapTable {
    next_roadmap_id: u64,
    next_step_id: u64,
    rows: BTreeMap<RoadmapId, RoadmapRecord>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
    chats: Arc<Mutex<HashMap<ChatId, Chat>>>,
    messages: Arc<Mutex<Vec<Message>>>,
    votes: Arc<Mutex<HashMap<(ChatId, MessageId), Vote>>>,
    roadmaps: Arc<Mutex<RoadmapTable>>,
    kv: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::Connection(e.to_string()))
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn insert_user(&self, user: &User) -> Result<(), StorageError> {
        let mut guard = lock(&self.users)?;
        let taken = guard.contains_key(&user.id())
            || guard.values().any(|existing| existing.email() == user.email());
        if taken {
            return Err(StorageError::Conflict);
        }
        guard.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let guard = lock(&self.users)?;
        Ok(guard.values().find(|user| user.email() == email).cloned())
    }
}

#[async_trait]
impl ChatRepository for InMemoryRepository {
    async fn insert_chat(&self, chat: &Chat) -> Result<(), StorageError> {
        let mut guard = lock(&self.chats)?;
        if guard.contains_key(&chat.id()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(chat.id(), chat.clone());
        Ok(())
    }

    async fn get_chat(&self, id: ChatId) -> Result<Option<Chat>, StorageError> {
        let guard = lock(&self.chats)?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_chats(&self, user_id: UserId) -> Result<Vec<Chat>, StorageError> {
        let guard = lock(&self.chats)?;
        let mut chats: Vec<Chat> = guard
            .values()
            .filter(|chat| chat.user_id() == user_id)
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(chats)
    }

    async fn delete_chat(&self, id: ChatId) -> Result<(), StorageError> {
        lock(&self.chats)?
            .remove(&id)
            .ok_or(StorageError::NotFound)?;
        lock(&self.messages)?.retain(|message| message.chat_id() != id);
        lock(&self.votes)?.retain(|(chat_id, _), _| *chat_id != id);
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for InMemoryRepository {
    async fn append_message(&self, message: &Message) -> Result<(), StorageError> {
        if !lock(&self.chats)?.contains_key(&message.chat_id()) {
            return Err(StorageError::NotFound);
        }
        let mut guard = lock(&self.messages)?;
        if guard.iter().any(|existing| existing.id() == message.id()) {
            return Err(StorageError::Conflict);
        }
        guard.push(message.clone());
        Ok(())
    }

    async fn list_messages(&self, chat_id: ChatId) -> Result<Vec<Message>, StorageError> {
        let guard = lock(&self.messages)?;
        Ok(guard
            .iter()
            .filter(|message| message.chat_id() == chat_id)
            .cloned()
            .collect())
    }

    async fn get_message(&self, id: MessageId) -> Result<Option<Message>, StorageError> {
        let guard = lock(&self.messages)?;
        Ok(guard.iter().find(|message| message.id() == id).cloned())
    }
}

#[async_trait]
impl VoteRepository for InMemoryRepository {
    async fn upsert_vote(&self, vote: &Vote) -> Result<(), StorageError> {
        let mut guard = lock(&self.votes)?;
        guard.insert((vote.chat_id, vote.message_id), *vote);
        Ok(())
    }

    async fn list_votes(&self, chat_id: ChatId) -> Result<Vec<Vote>, StorageError> {
        let guard = lock(&self.votes)?;
        Ok(guard
            .values()
            .filter(|vote| vote.chat_id == chat_id)
            .copied()
            .collect())
    }
}

#[async_trait]
impl RoadmapRepository for InMemoryRepository {
    async fn insert_roadmap(&self, roadmap: NewRoadmapRecord) -> Result<RoadmapId, StorageError> {
        let mut table = lock(&self.roadmaps)?;
        table.next_roadmap_id += 1;
        let id = RoadmapId::new(table.next_roadmap_id);

        let mut steps = Vec::with_capacity(roadmap.steps.len());
        for (position, step) in roadmap.steps.into_iter().enumerate() {
            table.next_step_id += 1;
            steps.push(RoadmapStepRecord {
                id: RoadmapStepId::new(table.next_step_id),
                position: u32::try_from(position)
                    .map_err(|_| StorageError::Serialization("position overflow".into()))?,
                title: step.title,
                description: step.description,
                created_at: roadmap.created_at,
            });
        }

        table.rows.insert(
            id,
            RoadmapRecord {
                id,
                title: roadmap.title,
                description: roadmap.description,
                created_at: roadmap.created_at,
                updated_at: roadmap.created_at,
                steps,
            },
        );
        Ok(id)
    }

    async fn get_roadmap(&self, id: RoadmapId) -> Result<Option<RoadmapRecord>, StorageError> {
        let table = lock(&self.roadmaps)?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn list_roadmaps(&self) -> Result<Vec<RoadmapSummary>, StorageError> {
        let table = lock(&self.roadmaps)?;
        let mut summaries = table
            .rows
            .values()
            .rev()
            .map(|record| {
                Ok(RoadmapSummary {
                    id: record.id,
                    title: record.title.clone(),
                    description: record.description.clone(),
                    step_count: u32::try_from(record.steps.len())
                        .map_err(|_| StorageError::Serialization("step count overflow".into()))?,
                    created_at: record.created_at,
                    updated_at: record.updated_at,
                })
            })
            .collect::<Result<Vec<_>, StorageError>>()?;
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = lock(&self.kv)?;
        Ok(guard.get(key).cloned())
    }

    async fn set_many(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        let mut guard = lock(&self.kv)?;
        for (key, value) in entries {
            guard.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    async fn remove_many(&self, keys: &[String]) -> Result<(), StorageError> {
        let mut guard = lock(&self.kv)?;
        for key in keys {
            guard.remove(key);
        }
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub chats: Arc<dyn ChatRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub votes: Arc<dyn VoteRepository>,
    pub roadmaps: Arc<dyn RoadmapRepository>,
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self::from_backend(&repo)
    }

    pub(crate) fn from_backend<R>(repo: &R) -> Self
    where
        R: UserRepository
            + ChatRepository
            + MessageRepository
            + VoteRepository
            + RoadmapRepository
            + KeyValueStore
            + Clone
            + 'static,
    {
        Self {
            users: Arc::new(repo.clone()),
            chats: Arc::new(repo.clone()),
            messages: Arc::new(repo.clone()),
            votes: Arc::new(repo.clone()),
            roadmaps: Arc::new(repo.clone()),
            kv: Arc::new(repo.clone()),
        }
    }
}
