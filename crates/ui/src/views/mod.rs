mod chat;
mod composer;
mod home;
mod learning_card;
mod learning_pathway;
mod roadmaps;
mod scripts;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use chat::ChatView;
pub use composer::Composer;
pub use home::HomeView;
pub use learning_card::LearningCardView;
pub use learning_pathway::{LearningPathwayView, QuizPick};
pub use roadmaps::{RoadmapView, RoadmapsView};
pub use state::{ViewError, ViewState, view_state_from_resource};
