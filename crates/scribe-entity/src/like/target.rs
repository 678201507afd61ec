//! Like target enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of object a like is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LikeTarget {
    /// A like on a post.
    Post,
    /// A like on a comment.
    Comment,
}

impl LikeTarget {
    /// Return the target kind as the stored uppercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Comment => "COMMENT",
        }
    }
}

impl fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
