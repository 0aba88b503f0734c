use std::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tutor_core::model::{
    Chat, ChatId, Message, MessageId, Role, RoadmapId, RoadmapStepId, User, UserId, Visibility,
    Vote,
};

use crate::repository::{RoadmapStepRecord, RoadmapSummary, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Maps write failures, turning constraint violations into domain errors.
pub(crate) fn write_err(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => StorageError::NotFound,
        _ => StorageError::Connection(e.to_string()),
    }
}

pub(crate) fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn parse<T>(row: &SqliteRow, column: &str) -> Result<T, StorageError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    row.try_get::<String, _>(column)
        .map_err(ser)?
        .parse::<T>()
        .map_err(ser)
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} out of range")))
}

pub(crate) fn serial_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn roadmap_id_from_i64(v: i64) -> Result<RoadmapId, StorageError> {
    Ok(RoadmapId::new(i64_to_u64("roadmap_id", v)?))
}

pub(crate) fn map_user_row(row: &SqliteRow) -> Result<User, StorageError> {
    User::new(
        parse::<UserId>(row, "id")?,
        row.try_get::<String, _>("email").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_chat_row(row: &SqliteRow) -> Result<Chat, StorageError> {
    Chat::new(
        parse::<ChatId>(row, "id")?,
        parse::<UserId>(row, "user_id")?,
        row.try_get::<String, _>("title").map_err(ser)?,
        parse::<Visibility>(row, "visibility")?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_message_row(row: &SqliteRow) -> Result<Message, StorageError> {
    Message::new(
        parse::<MessageId>(row, "id")?,
        parse::<ChatId>(row, "chat_id")?,
        parse::<Role>(row, "role")?,
        row.try_get::<String, _>("content").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_vote_row(row: &SqliteRow) -> Result<Vote, StorageError> {
    Ok(Vote {
        chat_id: parse::<ChatId>(row, "chat_id")?,
        message_id: parse::<MessageId>(row, "message_id")?,
        is_upvoted: row.try_get::<i64, _>("is_upvoted").map_err(ser)? != 0,
    })
}

pub(crate) fn map_roadmap_summary_row(row: &SqliteRow) -> Result<RoadmapSummary, StorageError> {
    Ok(RoadmapSummary {
        id: roadmap_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        step_count: i64_to_u32("step_count", row.try_get::<i64, _>("step_count").map_err(ser)?)?,
        created_at: row.try_get("created_at").map_err(ser)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

pub(crate) fn map_roadmap_step_row(row: &SqliteRow) -> Result<RoadmapStepRecord, StorageError> {
    Ok(RoadmapStepRecord {
        id: RoadmapStepId::new(i64_to_u64("step_id", row.try_get::<i64, _>("id").map_err(ser)?)?),
        position: i64_to_u32("position", row.try_get::<i64, _>("position").map_err(ser)?)?,
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}
