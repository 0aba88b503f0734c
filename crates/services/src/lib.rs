#![forbid(unsafe_code)]

pub mod ai;
pub mod app_services;
pub mod chat_service;
pub mod error;
pub mod progress_service;
pub mod roadmap_service;
pub mod vote_service;

pub use tutor_core::Clock;

pub use app_services::{AppServices, DEFAULT_USER_EMAIL, ServicesConfig};
pub use chat_service::{ChatService, ThreadEntry};
pub use error::{
    AiClientError, AppServicesError, ChatServiceError, ProgressServiceError, RoadmapServiceError,
    VoteServiceError,
};
pub use progress_service::ProgressService;
pub use roadmap_service::{RoadmapRecord, RoadmapService, RoadmapStepRecord, RoadmapSummary};
pub use vote_service::{VoteKind, VoteService};
