use tutor_core::model::{ChatId, Vote};

use super::SqliteRepository;
use super::mapping::{conn, map_vote_row, write_err};
use crate::repository::{StorageError, VoteRepository};

#[async_trait::async_trait]
impl VoteRepository for SqliteRepository {
    async fn upsert_vote(&self, vote: &Vote) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO votes (chat_id, message_id, is_upvoted)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(chat_id, message_id) DO UPDATE SET
                is_upvoted = excluded.is_upvoted
            ",
        )
        .bind(vote.chat_id.to_string())
        .bind(vote.message_id.to_string())
        .bind(i64::from(vote.is_upvoted))
        .execute(&self.pool)
        .await
        .map_err(write_err)?;
        Ok(())
    }

    async fn list_votes(&self, chat_id: ChatId) -> Result<Vec<Vote>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT chat_id, message_id, is_upvoted
            FROM votes WHERE chat_id = ?1
            ",
        )
        .bind(chat_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_vote_row).collect()
    }
}
