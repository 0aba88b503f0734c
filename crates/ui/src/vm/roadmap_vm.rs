use services::{RoadmapRecord, RoadmapSummary};
use tutor_core::model::RoadmapId;

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadmapCardVm {
    pub id: RoadmapId,
    pub title: String,
    pub description: Option<String>,
    pub steps_label: String,
    pub created_at_str: String,
}

impl From<&RoadmapSummary> for RoadmapCardVm {
    fn from(summary: &RoadmapSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title.clone(),
            description: summary.description.clone(),
            steps_label: steps_label(summary.step_count),
            created_at_str: format_datetime(summary.created_at),
        }
    }
}

#[must_use]
pub fn map_roadmap_cards(items: &[RoadmapSummary]) -> Vec<RoadmapCardVm> {
    items.iter().map(RoadmapCardVm::from).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadmapDetailVm {
    pub title: String,
    pub description: Option<String>,
    pub created_at_str: String,
    pub steps: Vec<RoadmapStepVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadmapStepVm {
    pub number: u32,
    pub title: String,
    pub description: Option<String>,
}

impl From<&RoadmapRecord> for RoadmapDetailVm {
    fn from(record: &RoadmapRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            created_at_str: format_datetime(record.created_at),
            steps: record
                .steps
                .iter()
                .map(|step| RoadmapStepVm {
                    number: step.position + 1,
                    title: step.title.clone(),
                    description: step.description.clone(),
                })
                .collect(),
        }
    }
}

fn steps_label(count: u32) -> String {
    if count == 1 {
        "1 step".to_string()
    } else {
        format!("{count} steps")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::time::fixed_now;

    #[test]
    fn summary_maps_to_card() {
        let summary = RoadmapSummary {
            id: RoadmapId::new(4),
            title: "Web".into(),
            description: None,
            step_count: 1,
            created_at: fixed_now(),
            updated_at: fixed_now(),
        };
        let cards = map_roadmap_cards(&[summary]);
        assert_eq!(cards[0].steps_label, "1 step");
        assert_eq!(cards[0].created_at_str, "Nov 14, 22:13");
        assert_eq!(steps_label(3), "3 steps");
    }
}
