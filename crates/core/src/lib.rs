//! Domain types for the tutor: chats and messages, the learning card and
//! pathway payloads the assistant produces, and pathway progress tracking.

pub mod model;
pub mod payload;
pub mod progress;
pub mod time;

pub use time::Clock;
