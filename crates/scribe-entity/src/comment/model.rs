//! Comment entity model.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use scribe_core::traits::Entity;

use super::status::CommentStatus;

/// A comment on a post, optionally replying to another comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique comment identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Comment body.
    pub content: String,
    /// The authoring user.
    pub author: ObjectId,
    /// The post this comment belongs to.
    pub post: ObjectId,
    /// The parent comment if this is a reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ObjectId>,
    /// Moderation status.
    pub status: CommentStatus,
    /// Denormalized like counter.
    pub like_count: i64,
    /// Denormalized reply counter.
    pub reply_count: i64,

    // -- Audit block --
    /// When the comment was created.
    pub created_at: DateTime,
    /// When the comment was last updated.
    pub updated_at: DateTime,
    /// Who created the comment (the author).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    /// Who last updated the comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<ObjectId>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted: bool,
    /// When the comment was soft-deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime>,
    /// Who soft-deleted the comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<ObjectId>,
}

impl Comment {
    /// Create a new active comment with zeroed counters and audit stamps.
    pub fn new(
        content: impl Into<String>,
        author: ObjectId,
        post: ObjectId,
        parent: Option<ObjectId>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            content: content.into(),
            author,
            post,
            parent,
            status: CommentStatus::Active,
            like_count: 0,
            reply_count: 0,
            created_at: now,
            updated_at: now,
            created_by: Some(author),
            updated_by: None,
            deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }

    /// Check whether this comment is a reply to another comment.
    pub fn is_reply(&self) -> bool {
        self.parent.is_some()
    }
}

impl Entity for Comment {
    const COLLECTION: &'static str = "comments";

    fn id(&self) -> ObjectId {
        self.id
    }
}
