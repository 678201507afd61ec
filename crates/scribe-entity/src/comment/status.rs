//! Comment status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Moderation status of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommentStatus {
    /// Visible in listings.
    Active,
    /// Flagged as spam; hidden from public listings.
    Spam,
}

impl CommentStatus {
    /// Return the status as the stored uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Spam => "SPAM",
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
