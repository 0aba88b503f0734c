use tutor_core::model::RoadmapId;

use super::SqliteRepository;
use super::mapping::{
    conn, map_roadmap_step_row, map_roadmap_summary_row, roadmap_id_from_i64, serial_to_i64,
    write_err,
};
use crate::repository::{
    NewRoadmapRecord, RoadmapRecord, RoadmapRepository, RoadmapSummary, StorageError,
};

const SUMMARY_SELECT: &str = r"
    SELECT r.id, r.title, r.description, r.created_at, r.updated_at,
           COUNT(s.id) AS step_count
    FROM roadmaps r
    LEFT JOIN roadmap_steps s ON s.roadmap_id = r.id
";

#[async_trait::async_trait]
impl RoadmapRepository for SqliteRepository {
    async fn insert_roadmap(&self, roadmap: NewRoadmapRecord) -> Result<RoadmapId, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let res = sqlx::query(
            r"
            INSERT INTO roadmaps (title, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            ",
        )
        .bind(&roadmap.title)
        .bind(&roadmap.description)
        .bind(roadmap.created_at)
        .execute(&mut *tx)
        .await
        .map_err(write_err)?;
        let roadmap_id = res.last_insert_rowid();

        for (position, step) in roadmap.steps.iter().enumerate() {
            let position = i64::try_from(position)
                .map_err(|_| StorageError::Serialization("position overflow".into()))?;
            sqlx::query(
                r"
                INSERT INTO roadmap_steps (roadmap_id, title, description, position, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ",
            )
            .bind(roadmap_id)
            .bind(&step.title)
            .bind(&step.description)
            .bind(position)
            .bind(roadmap.created_at)
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;
        }

        tx.commit().await.map_err(conn)?;
        roadmap_id_from_i64(roadmap_id)
    }

    async fn get_roadmap(&self, id: RoadmapId) -> Result<Option<RoadmapRecord>, StorageError> {
        let raw_id = serial_to_i64("roadmap_id", id.value())?;
        let row = sqlx::query(&format!("{SUMMARY_SELECT} WHERE r.id = ?1 GROUP BY r.id"))
            .bind(raw_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let summary = map_roadmap_summary_row(&row)?;

        let step_rows = sqlx::query(
            r"
            SELECT id, title, description, position, created_at
            FROM roadmap_steps
            WHERE roadmap_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(raw_id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;
        let steps = step_rows
            .iter()
            .map(map_roadmap_step_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(RoadmapRecord {
            id: summary.id,
            title: summary.title,
            description: summary.description,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
            steps,
        }))
    }

    async fn list_roadmaps(&self) -> Result<Vec<RoadmapSummary>, StorageError> {
        let rows = sqlx::query(&format!(
            "{SUMMARY_SELECT} GROUP BY r.id ORDER BY r.created_at DESC, r.id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_roadmap_summary_row).collect()
    }
}
