//! Persistence for chats, messages, votes, saved roadmaps, and client-side
//! key/value state.

pub mod repository;
pub mod sqlite;
