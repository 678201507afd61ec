//! Response DTOs.
//!
//! Entities are mapped to JSON-friendly shapes: ObjectIds become hex
//! strings, BSON datetimes become RFC 3339 timestamps, and credential
//! fields are dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use scribe_database::views::{AuthorSummary, CommentWithAuthor, PostWithAuthor};
use scribe_entity::{Comment, Like, Post, User};
use scribe_service::auth::AuthTokens;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// User profile for responses. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub address: String,
    pub is_active: bool,
    pub is_email_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone_number: user.phone_number,
            role: user.role.as_str().to_string(),
            avatar: user.avatar,
            address: user.address,
            is_active: user.is_active,
            is_email_verified: user.is_email_verified,
            last_login_at: user.last_login_at.map(|d| d.to_chrono()),
            created_at: user.created_at.to_chrono(),
            updated_at: user.updated_at.to_chrono(),
        }
    }
}

/// Login and refresh response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    #[serde(flatten)]
    pub tokens: AuthTokens,
}

/// Embedded author summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<AuthorSummary> for AuthorResponse {
    fn from(author: AuthorSummary) -> Self {
        Self {
            id: author.id.to_hex(),
            first_name: author.first_name,
            last_name: author.last_name,
            email: author.email,
            avatar: author.avatar,
        }
    }
}

/// A post for responses; `author` is a hex ID.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    pub author: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub allow_comments: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    pub meta_keywords: Vec<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.to_hex(),
            slug: post.slug,
            title: post.title,
            content: post.content,
            featured_image: post.featured_image,
            author: post.author.to_hex(),
            status: post.status.as_str().to_string(),
            published_at: post.published_at.map(|d| d.to_chrono()),
            tags: post.tags,
            allow_comments: post.allow_comments,
            meta_description: post.meta_description,
            meta_keywords: post.meta_keywords,
            view_count: post.view_count,
            like_count: post.like_count,
            comment_count: post.comment_count,
            created_at: post.created_at.to_chrono(),
            updated_at: post.updated_at.to_chrono(),
        }
    }
}

/// A post with its author embedded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWithAuthorResponse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorResponse>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub allow_comments: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    pub meta_keywords: Vec<String>,
    pub view_count: i64,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PostWithAuthor> for PostWithAuthorResponse {
    fn from(post: PostWithAuthor) -> Self {
        Self {
            id: post.id.to_hex(),
            slug: post.slug,
            title: post.title,
            content: post.content,
            featured_image: post.featured_image,
            author: post.author.map(AuthorResponse::from),
            status: post.status.as_str().to_string(),
            published_at: post.published_at.map(|d| d.to_chrono()),
            tags: post.tags,
            allow_comments: post.allow_comments,
            meta_description: post.meta_description,
            meta_keywords: post.meta_keywords,
            view_count: post.view_count,
            like_count: post.like_count,
            comment_count: post.comment_count,
            created_at: post.created_at.to_chrono(),
            updated_at: post.updated_at.to_chrono(),
        }
    }
}

/// A comment for responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub author: String,
    pub post: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub status: String,
    pub like_count: i64,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.to_hex(),
            content: comment.content,
            author: comment.author.to_hex(),
            post: comment.post.to_hex(),
            parent: comment.parent.map(|p| p.to_hex()),
            status: comment.status.as_str().to_string(),
            like_count: comment.like_count,
            reply_count: comment.reply_count,
            created_at: comment.created_at.to_chrono(),
            updated_at: comment.updated_at.to_chrono(),
        }
    }
}

/// A comment with its author embedded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithAuthorResponse {
    pub id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorResponse>,
    pub post: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub status: String,
    pub like_count: i64,
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentWithAuthor> for CommentWithAuthorResponse {
    fn from(comment: CommentWithAuthor) -> Self {
        Self {
            id: comment.id.to_hex(),
            content: comment.content,
            author: comment.author.map(AuthorResponse::from),
            post: comment.post.to_hex(),
            parent: comment.parent.map(|p| p.to_hex()),
            status: comment.status.as_str().to_string(),
            like_count: comment.like_count,
            reply_count: comment.reply_count,
            created_at: comment.created_at.to_chrono(),
            updated_at: comment.updated_at.to_chrono(),
        }
    }
}

/// A like for responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub id: String,
    pub user: String,
    pub like_type: String,
    pub target_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<Like> for LikeResponse {
    fn from(like: Like) -> Self {
        Self {
            id: like.id.to_hex(),
            user: like.user.to_hex(),
            like_type: like.like_type.as_str().to_string(),
            target_id: like.target_id.to_hex(),
            created_at: like.created_at.to_chrono(),
        }
    }
}

/// Like status for a target.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatusResponse {
    pub liked: bool,
    pub like_count: u64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Database reachability.
    pub database: String,
    /// Build version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    #[test]
    fn user_response_drops_password_hash() {
        let user = User::new("Ada", "Lovelace", "ada@example.com", "+15550100", "$argon2$secret");
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "USER");
        assert_eq!(json["firstName"], "Ada");
    }

    #[test]
    fn post_response_uses_hex_ids() {
        let author = ObjectId::new();
        let post = Post::new("Hello", "hello", "body", author);
        let resp = PostResponse::from(post);
        assert_eq!(resp.author, author.to_hex());
        assert_eq!(resp.status, "DRAFT");
    }
}
