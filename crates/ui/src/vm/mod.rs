mod card_vm;
mod markdown_vm;
mod pathway_vm;
mod roadmap_vm;
mod thread_vm;
mod time_fmt;

pub use card_vm::{CardTab, ResourceVm, card_badges, numbered_questions, resource_vms};
pub use markdown_vm::{markdown_to_html, normalize_markdown, sanitize_html};
pub use pathway_vm::{
    CELEBRATION_MS, CONFETTI_PALETTE, CONFETTI_PIECES, ConfettiPiece, FurtherLearningVm,
    LevelBarVm, LinkVm, MilestoneVm, OptionTone, PathwayNav, QuizOptionVm, QuizVm, StepRowVm,
    TrackerVm, confetti, further_learning, level_icon, level_tone, quiz_vm, step_rows, tracker,
};
pub use roadmap_vm::{RoadmapCardVm, RoadmapDetailVm, RoadmapStepVm, map_roadmap_cards};
pub use thread_vm::{
    GREETING_SUBTITLE, GREETING_TITLE, MessageBody, MessageVm, THINKING_LABEL, map_thread,
    show_thinking,
};
pub use time_fmt::format_datetime;
