use tutor_core::model::{Chat, ChatId, UserId};

use super::SqliteRepository;
use super::mapping::{conn, map_chat_row, write_err};
use crate::repository::{ChatRepository, StorageError};

#[async_trait::async_trait]
impl ChatRepository for SqliteRepository {
    async fn insert_chat(&self, chat: &Chat) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO chats (id, user_id, title, visibility, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(chat.id().to_string())
        .bind(chat.user_id().to_string())
        .bind(chat.title())
        .bind(chat.visibility().as_str())
        .bind(chat.created_at())
        .execute(&self.pool)
        .await
        .map_err(write_err)?;
        Ok(())
    }

    async fn get_chat(&self, id: ChatId) -> Result<Option<Chat>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, title, visibility, created_at
            FROM chats WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;
        row.as_ref().map(map_chat_row).transpose()
    }

    async fn list_chats(&self, user_id: UserId) -> Result<Vec<Chat>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, title, visibility, created_at
            FROM chats
            WHERE user_id = ?1
            ORDER BY created_at DESC, rowid DESC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_chat_row).collect()
    }

    async fn delete_chat(&self, id: ChatId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM chats WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
