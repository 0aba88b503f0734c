use std::sync::Arc;

use storage::repository::{NewRoadmapRecord, NewRoadmapStep, RoadmapRepository};
pub use storage::repository::{RoadmapRecord, RoadmapStepRecord, RoadmapSummary};
use tutor_core::model::{Pathway, RoadmapId, Step};

use crate::Clock;
use crate::error::RoadmapServiceError;

/// Saves generated pathways as flat, ordered roadmaps.
#[derive(Clone)]
pub struct RoadmapService {
    clock: Clock,
    roadmaps: Arc<dyn RoadmapRepository>,
}

impl RoadmapService {
    #[must_use]
    pub fn new(clock: Clock, roadmaps: Arc<dyn RoadmapRepository>) -> Self {
        Self { clock, roadmaps }
    }

    /// Save `pathway` as a roadmap. Steps are ordered level by level
    /// (Beginner first), keeping their order within each level.
    ///
    /// # Errors
    ///
    /// Returns `RoadmapServiceError::EmptyPathway` when there is nothing to
    /// save, or storage errors.
    pub async fn save_pathway(&self, pathway: &Pathway) -> Result<RoadmapId, RoadmapServiceError> {
        let steps: Vec<NewRoadmapStep> = pathway
            .levels
            .iter()
            .flat_map(|entry| entry.steps.iter().map(move |step| (entry.level, step)))
            .map(|(level, step)| NewRoadmapStep {
                title: format!("{level}: {}", step.title),
                description: step_summary(step),
            })
            .collect();
        if steps.is_empty() {
            return Err(RoadmapServiceError::EmptyPathway);
        }

        let description = Some(pathway.description.clone()).filter(|d| !d.trim().is_empty());
        let id = self
            .roadmaps
            .insert_roadmap(NewRoadmapRecord {
                title: pathway.title.clone(),
                description,
                steps,
                created_at: self.clock.now(),
            })
            .await?;
        tracing::info!(roadmap_id = %id, "saved roadmap");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `RoadmapServiceError::NotFound` or storage errors.
    pub async fn get(&self, id: RoadmapId) -> Result<RoadmapRecord, RoadmapServiceError> {
        self.roadmaps
            .get_roadmap(id)
            .await?
            .ok_or(RoadmapServiceError::NotFound)
    }

    /// Saved roadmaps, newest first.
    ///
    /// # Errors
    ///
    /// Returns storage errors.
    pub async fn list(&self) -> Result<Vec<RoadmapSummary>, RoadmapServiceError> {
        Ok(self.roadmaps.list_roadmaps().await?)
    }
}

fn step_summary(step: &Step) -> Option<String> {
    [
        step.content.introduction.as_deref(),
        Some(step.content.explanation.as_str()),
    ]
    .into_iter()
    .flatten()
    .find(|text| !text.trim().is_empty())
    .map(str::to_string)
}
