//! Comment use cases: threads, replies, moderation, and counters.

use std::sync::Arc;

use bson::doc;
use bson::oid::ObjectId;
use serde::Deserialize;
use tracing::info;

use scribe_core::error::AppError;
use scribe_core::result::AppResult;
use scribe_core::types::{PageQuery, Paginated};
use scribe_database::repositories::{CommentRepository, PostRepository};
use scribe_database::views::CommentWithAuthor;
use scribe_entity::{Comment, CommentStatus};

use crate::context::RequestContext;

/// Maximum comment length in characters.
const MAX_CONTENT_LEN: usize = 5_000;

/// Input for creating a comment or reply.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    #[serde(default)]
    pub parent: Option<ObjectId>,
}

/// Manages comments on posts.
#[derive(Debug, Clone)]
pub struct CommentService {
    comment_repo: Arc<CommentRepository>,
    post_repo: Arc<PostRepository>,
}

impl CommentService {
    /// Creates a new comment service.
    pub fn new(comment_repo: Arc<CommentRepository>, post_repo: Arc<PostRepository>) -> Self {
        Self {
            comment_repo,
            post_repo,
        }
    }

    /// Creates a comment on a post, or a reply when `parent` is set.
    ///
    /// Bumps the post's comment counter, and the parent's reply counter
    /// for replies. Replies must target a top-level comment on the same
    /// post; threads are one level deep.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        post_id: ObjectId,
        request: CreateCommentRequest,
    ) -> AppResult<Comment> {
        let content = request.content.trim().to_string();
        if content.is_empty() {
            return Err(AppError::validation("Comment cannot be empty"));
        }
        if content.len() > MAX_CONTENT_LEN {
            return Err(AppError::validation("Comment is too long"));
        }

        let post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        if !post.is_published() {
            return Err(AppError::not_found("Post not found"));
        }
        if !post.allow_comments {
            return Err(AppError::validation("Comments are disabled on this post"));
        }

        if let Some(parent_id) = request.parent {
            let parent = self
                .comment_repo
                .find_by_id(parent_id)
                .await?
                .ok_or_else(|| AppError::not_found("Parent comment not found"))?;
            if parent.post != post.id {
                return Err(AppError::validation(
                    "Parent comment belongs to a different post",
                ));
            }
            if parent.is_reply() {
                return Err(AppError::validation("Cannot reply to a reply"));
            }
            if parent.status != CommentStatus::Active {
                return Err(AppError::not_found("Parent comment not found"));
            }
        }

        let comment = Comment::new(content, ctx.user_id, post.id, request.parent);
        let comment = self.comment_repo.base().create(comment, None).await?;

        self.post_repo.adjust_comment_count(post.id, 1, None).await?;
        if let Some(parent_id) = request.parent {
            self.comment_repo
                .adjust_reply_count(parent_id, 1, None)
                .await?;
        }

        info!(comment_id = %comment.id, post_id = %post.id, author = %ctx.user_id, "Comment created");
        Ok(comment)
    }

    /// Fetches a comment by ID.
    pub async fn get_by_id(&self, id: ObjectId) -> AppResult<Comment> {
        self.comment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))
    }

    /// A post's active top-level comments, authors embedded.
    pub async fn list_for_post(
        &self,
        post_id: ObjectId,
        query: &PageQuery,
    ) -> AppResult<Paginated<CommentWithAuthor>> {
        self.comment_repo.paginate_for_post(post_id, query).await
    }

    /// A comment's direct replies.
    pub async fn list_replies(
        &self,
        parent_id: ObjectId,
        query: &PageQuery,
    ) -> AppResult<Paginated<CommentWithAuthor>> {
        self.comment_repo.paginate_replies(parent_id, query).await
    }

    /// One author's comments (self or admin only).
    pub async fn list_by_author(
        &self,
        ctx: &RequestContext,
        author: ObjectId,
        query: &PageQuery,
    ) -> AppResult<Paginated<CommentWithAuthor>> {
        if author != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::authorization(
                "Cannot list another user's comments",
            ));
        }
        self.comment_repo.paginate_by_author(author, query).await
    }

    /// Edits a comment's content (author only).
    pub async fn update_content(
        &self,
        ctx: &RequestContext,
        id: ObjectId,
        content: String,
    ) -> AppResult<Comment> {
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(AppError::validation("Comment cannot be empty"));
        }
        if content.len() > MAX_CONTENT_LEN {
            return Err(AppError::validation("Comment is too long"));
        }

        let comment = self.get_by_id(id).await?;
        if comment.author != ctx.user_id {
            return Err(AppError::authorization(
                "Only the author may edit a comment",
            ));
        }

        self.comment_repo
            .update_by_id(
                comment.id,
                doc! { "$set": { "content": content, "updatedBy": ctx.user_id } },
                None,
            )
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))
    }

    /// Marks a comment as spam, hiding it from listings (admin only).
    pub async fn mark_spam(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<Comment> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin access required"));
        }
        let comment = self
            .comment_repo
            .update_by_id(
                id,
                doc! { "$set": { "status": CommentStatus::Spam.as_str(), "updatedBy": ctx.user_id } },
                None,
            )
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))?;
        info!(comment_id = %comment.id, by = %ctx.user_id, "Comment marked as spam");
        Ok(comment)
    }

    /// Soft-deletes a comment and rolls back the counters it contributed.
    ///
    /// Allowed for the comment author, the post author, or an admin.
    pub async fn delete(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<()> {
        let comment = self.get_by_id(id).await?;

        let allowed = if comment.author == ctx.user_id || ctx.is_admin() {
            true
        } else {
            self.post_repo
                .find_by_id(comment.post)
                .await?
                .map(|post| post.is_owned_by(ctx.user_id))
                .unwrap_or(false)
        };
        if !allowed {
            return Err(AppError::authorization(
                "Not allowed to delete this comment",
            ));
        }

        self.comment_repo
            .base()
            .soft_delete_by_id(comment.id, Some(ctx.user_id), None)
            .await?;

        self.post_repo
            .adjust_comment_count(comment.post, -1, None)
            .await?;
        if let Some(parent_id) = comment.parent {
            self.comment_repo
                .adjust_reply_count(parent_id, -1, None)
                .await?;
        }

        info!(comment_id = %comment.id, by = %ctx.user_id, "Comment deleted");
        Ok(())
    }
}
