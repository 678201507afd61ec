//! Post entity model.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use scribe_core::traits::Entity;

use super::status::PostStatus;

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique post identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// URL-friendly identifier (unique).
    pub slug: String,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Featured image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    /// The authoring user.
    pub author: ObjectId,
    /// Lifecycle status.
    pub status: PostStatus,
    /// When the post was published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether readers may comment.
    pub allow_comments: bool,
    /// SEO meta description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    /// SEO meta keywords.
    #[serde(default)]
    pub meta_keywords: Vec<String>,
    /// Denormalized view counter.
    pub view_count: i64,
    /// Denormalized like counter.
    pub like_count: i64,
    /// Denormalized comment counter.
    pub comment_count: i64,

    // -- Audit block --
    /// When the post was created.
    pub created_at: DateTime,
    /// When the post was last updated.
    pub updated_at: DateTime,
    /// Who created the post (the author).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    /// Who last updated the post.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<ObjectId>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted: bool,
    /// When the post was soft-deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime>,
    /// Who soft-deleted the post.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<ObjectId>,
}

impl Post {
    /// Create a new draft post with zeroed counters and audit stamps.
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        content: impl Into<String>,
        author: ObjectId,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            slug: slug.into(),
            title: title.into(),
            content: content.into(),
            featured_image: None,
            author,
            status: PostStatus::Draft,
            published_at: None,
            tags: Vec::new(),
            allow_comments: true,
            meta_description: None,
            meta_keywords: Vec::new(),
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            created_at: now,
            updated_at: now,
            created_by: Some(author),
            updated_by: None,
            deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }

    /// Check whether the post is publicly visible.
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published && !self.deleted
    }

    /// Check whether the given user may modify this post.
    pub fn is_owned_by(&self, user_id: ObjectId) -> bool {
        self.author == user_id
    }
}

impl Entity for Post {
    const COLLECTION: &'static str = "posts";

    fn id(&self) -> ObjectId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_is_draft() {
        let post = Post::new("Hello", "hello", "body", ObjectId::new());
        assert_eq!(post.status, PostStatus::Draft);
        assert!(post.allow_comments);
        assert_eq!(post.view_count, 0);
        assert!(!post.is_published());
    }

    #[test]
    fn ownership_check() {
        let author = ObjectId::new();
        let post = Post::new("Hello", "hello", "body", author);
        assert!(post.is_owned_by(author));
        assert!(!post.is_owned_by(ObjectId::new()));
    }
}
