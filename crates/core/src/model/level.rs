use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown pathway level: {0}")]
pub struct ParseLevelError(pub String);

/// Difficulty tier of a learning pathway. Ordering follows the learning order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }

    /// Case-insensitive lookup used for AI payload keys.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_sort_in_learning_order() {
        let mut levels = vec![Level::Advanced, Level::Beginner, Level::Intermediate];
        levels.sort();
        assert_eq!(levels, Level::ALL.to_vec());
    }

    #[test]
    fn keys_match_case_insensitively() {
        assert_eq!(Level::from_key("beginner"), Some(Level::Beginner));
        assert_eq!(Level::from_key(" ADVANCED "), Some(Level::Advanced));
        assert_eq!(Level::from_key("Expert"), None);
        assert!("Expert".parse::<Level>().is_err());
    }
}
