//! Like entity model.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use scribe_core::traits::Entity;

use super::target::LikeTarget;

/// A user's like on a post or comment.
///
/// `unique_key` is covered by a unique index and acts as the storage-level
/// backstop against duplicate likes when two requests race past the
/// service-level pre-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    /// Unique like identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// The liking user.
    pub user: ObjectId,
    /// The kind of target being liked.
    pub like_type: LikeTarget,
    /// The liked post or comment.
    pub target_id: ObjectId,
    /// Deterministic `user_target_type` key (unique).
    pub unique_key: String,

    // -- Audit block --
    /// When the like was created.
    pub created_at: DateTime,
    /// When the like was last updated.
    pub updated_at: DateTime,
    /// Who created the like (the liking user).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    /// Who last updated the like.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<ObjectId>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted: bool,
    /// When the like was soft-deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime>,
    /// Who soft-deleted the like.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<ObjectId>,
}

impl Like {
    /// Create a new like with its deterministic unique key.
    pub fn new(user: ObjectId, like_type: LikeTarget, target_id: ObjectId) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            user,
            like_type,
            target_id,
            unique_key: Self::unique_key(user, target_id, like_type),
            created_at: now,
            updated_at: now,
            created_by: Some(user),
            updated_by: None,
            deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }

    /// Build the deterministic `user_target_type` key.
    pub fn unique_key(user: ObjectId, target_id: ObjectId, like_type: LikeTarget) -> String {
        format!("{}_{}_{}", user.to_hex(), target_id.to_hex(), like_type)
    }
}

impl Entity for Like {
    const COLLECTION: &'static str = "likes";

    fn id(&self) -> ObjectId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_key_is_deterministic() {
        let user = ObjectId::new();
        let target = ObjectId::new();
        let a = Like::new(user, LikeTarget::Post, target);
        let b = Like::new(user, LikeTarget::Post, target);
        assert_eq!(a.unique_key, b.unique_key);
        assert!(a.unique_key.ends_with("_POST"));
    }

    #[test]
    fn unique_key_distinguishes_target_kind() {
        let user = ObjectId::new();
        let target = ObjectId::new();
        let post = Like::unique_key(user, target, LikeTarget::Post);
        let comment = Like::unique_key(user, target, LikeTarget::Comment);
        assert_ne!(post, comment);
    }
}
