//! Read models produced by relation-resolving queries.
//!
//! These structs deserialize aggregation output where a reference field
//! has been replaced by the (projected) joined document. An unresolved
//! reference deserializes as `None`.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use scribe_entity::{CommentStatus, PostStatus};

/// The author fields embedded by the default user join.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    /// The author's user id.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A post with its author embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWithAuthor {
    /// Unique post identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// URL-friendly identifier.
    pub slug: String,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Featured image URL.
    #[serde(default)]
    pub featured_image: Option<String>,
    /// The resolved author (None when the reference is dangling).
    #[serde(default)]
    pub author: Option<AuthorSummary>,
    /// Lifecycle status.
    pub status: PostStatus,
    /// When the post was published.
    #[serde(default)]
    pub published_at: Option<DateTime>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether readers may comment.
    pub allow_comments: bool,
    /// SEO meta description.
    #[serde(default)]
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
    /// When the post was created.
    pub created_at: DateTime,
    /// When the post was last updated.
    pub updated_at: DateTime,
}

/// A comment with its author embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithAuthor {
    /// Unique comment identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Comment body.
    pub content: String,
    /// The resolved author (None when the reference is dangling).
    #[serde(default)]
    pub author: Option<AuthorSummary>,
    /// The post this comment belongs to.
    pub post: ObjectId,
    /// The parent comment if this is a reply.
    #[serde(default)]
    pub parent: Option<ObjectId>,
    /// Moderation status.
    pub status: CommentStatus,
    /// Denormalized like counter.
    pub like_count: i64,
    /// Denormalized reply counter.
    pub reply_count: i64,
    /// When the comment was created.
    pub created_at: DateTime,
    /// When the comment was last updated.
    pub updated_at: DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn post_with_unresolved_author_deserializes_as_none() {
        let doc = doc! {
            "_id": ObjectId::new(),
            "slug": "hello",
            "title": "Hello",
            "content": "body",
            "author": null,
            "status": "PUBLISHED",
            "tags": ["rust"],
            "allowComments": true,
            "metaKeywords": [],
            "viewCount": 3_i64,
            "likeCount": 0_i64,
            "commentCount": 0_i64,
            "createdAt": DateTime::now(),
            "updatedAt": DateTime::now(),
        };
        let view: PostWithAuthor = bson::from_document(doc).unwrap();
        assert!(view.author.is_none());
        assert_eq!(view.view_count, 3);
    }

    #[test]
    fn post_with_embedded_author_deserializes() {
        let author_id = ObjectId::new();
        let doc = doc! {
            "_id": ObjectId::new(),
            "slug": "hello",
            "title": "Hello",
            "content": "body",
            "author": {
                "_id": author_id,
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
            },
            "status": "DRAFT",
            "tags": [],
            "allowComments": true,
            "metaKeywords": [],
            "viewCount": 0_i64,
            "likeCount": 0_i64,
            "commentCount": 0_i64,
            "createdAt": DateTime::now(),
            "updatedAt": DateTime::now(),
        };
        let view: PostWithAuthor = bson::from_document(doc).unwrap();
        let author = view.author.unwrap();
        assert_eq!(author.id, author_id);
        assert_eq!(author.first_name, "Ada");
        assert!(author.avatar.is_none());
    }
}
