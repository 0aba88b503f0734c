use tutor_core::model::User;

use super::SqliteRepository;
use super::mapping::{conn, map_user_row, write_err};
use crate::repository::{StorageError, UserRepository};

#[async_trait::async_trait]
impl UserRepository for SqliteRepository {
    async fn insert_user(&self, user: &User) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO users (id, email) VALUES (?1, ?2)")
            .bind(user.id().to_string())
            .bind(user.email())
            .execute(&self.pool)
            .await
            .map_err(write_err)?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT id, email FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        row.as_ref().map(map_user_row).transpose()
    }
}
