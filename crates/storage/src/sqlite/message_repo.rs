use tutor_core::model::{ChatId, Message, MessageId};

use super::SqliteRepository;
use super::mapping::{conn, map_message_row, write_err};
use crate::repository::{MessageRepository, StorageError};

#[async_trait::async_trait]
impl MessageRepository for SqliteRepository {
    async fn append_message(&self, message: &Message) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO messages (id, chat_id, role, content, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(message.id().to_string())
        .bind(message.chat_id().to_string())
        .bind(message.role().as_str())
        .bind(message.content())
        .bind(message.created_at())
        .execute(&self.pool)
        .await
        .map_err(write_err)?;
        Ok(())
    }

    async fn list_messages(&self, chat_id: ChatId) -> Result<Vec<Message>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, chat_id, role, content, created_at
            FROM messages
            WHERE chat_id = ?1
            ORDER BY created_at ASC, rowid ASC
            ",
        )
        .bind(chat_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_message_row).collect()
    }

    async fn get_message(&self, id: MessageId) -> Result<Option<Message>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, chat_id, role, content, created_at
            FROM messages WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;
        row.as_ref().map(map_message_row).transpose()
    }
}
