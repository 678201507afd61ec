//! Like/unlike use cases with denormalized counter maintenance.

use std::sync::Arc;

use bson::oid::ObjectId;
use tracing::info;

use scribe_core::error::AppError;
use scribe_core::result::AppResult;
use scribe_core::types::{PageQuery, Paginated};
use scribe_database::repositories::{CommentRepository, LikeRepository, PostRepository};
use scribe_entity::{Like, LikeTarget};

use crate::context::RequestContext;

/// Manages likes across posts and comments.
#[derive(Debug, Clone)]
pub struct LikeService {
    like_repo: Arc<LikeRepository>,
    post_repo: Arc<PostRepository>,
    comment_repo: Arc<CommentRepository>,
}

impl LikeService {
    /// Creates a new like service.
    pub fn new(
        like_repo: Arc<LikeRepository>,
        post_repo: Arc<PostRepository>,
        comment_repo: Arc<CommentRepository>,
    ) -> Self {
        Self {
            like_repo,
            post_repo,
            comment_repo,
        }
    }

    /// Likes a target. Liking twice is a conflict; the unique index on
    /// the like key backs this up under concurrency.
    pub async fn like(
        &self,
        ctx: &RequestContext,
        target_id: ObjectId,
        like_type: LikeTarget,
    ) -> AppResult<Like> {
        self.ensure_target_exists(target_id, like_type).await?;

        if self
            .like_repo
            .exists_for(ctx.user_id, target_id, like_type)
            .await?
        {
            return Err(AppError::conflict("Already liked"));
        }

        let like = Like::new(ctx.user_id, like_type, target_id);
        let like = self.like_repo.base().create(like, None).await?;
        self.adjust_counter(target_id, like_type, 1).await?;

        info!(user_id = %ctx.user_id, target = %target_id, kind = like_type.as_str(), "Liked");
        Ok(like)
    }

    /// Removes a like. Unliking something never liked is a no-op error.
    pub async fn unlike(
        &self,
        ctx: &RequestContext,
        target_id: ObjectId,
        like_type: LikeTarget,
    ) -> AppResult<()> {
        let removed = self
            .like_repo
            .remove_for(ctx.user_id, target_id, like_type, None)
            .await?;
        if !removed {
            return Err(AppError::not_found("Like not found"));
        }
        self.adjust_counter(target_id, like_type, -1).await?;

        info!(user_id = %ctx.user_id, target = %target_id, kind = like_type.as_str(), "Unliked");
        Ok(())
    }

    /// Whether the current user has liked a target.
    pub async fn is_liked(
        &self,
        ctx: &RequestContext,
        target_id: ObjectId,
        like_type: LikeTarget,
    ) -> AppResult<bool> {
        self.like_repo
            .exists_for(ctx.user_id, target_id, like_type)
            .await
    }

    /// The authoritative like count for a target.
    pub async fn count(&self, target_id: ObjectId, like_type: LikeTarget) -> AppResult<u64> {
        self.like_repo.count_for_target(target_id, like_type).await
    }

    /// Paginated listing of the likes on a target.
    pub async fn list_for_target(
        &self,
        target_id: ObjectId,
        like_type: LikeTarget,
        query: &PageQuery,
    ) -> AppResult<Paginated<Like>> {
        self.like_repo
            .paginate_for_target(target_id, like_type, query)
            .await
    }

    async fn ensure_target_exists(
        &self,
        target_id: ObjectId,
        like_type: LikeTarget,
    ) -> AppResult<()> {
        let exists = match like_type {
            LikeTarget::Post => self
                .post_repo
                .find_by_id(target_id)
                .await?
                .map(|p| p.is_published())
                .unwrap_or(false),
            LikeTarget::Comment => self.comment_repo.find_by_id(target_id).await?.is_some(),
        };
        if !exists {
            return Err(AppError::not_found(match like_type {
                LikeTarget::Post => "Post not found",
                LikeTarget::Comment => "Comment not found",
            }));
        }
        Ok(())
    }

    async fn adjust_counter(
        &self,
        target_id: ObjectId,
        like_type: LikeTarget,
        delta: i64,
    ) -> AppResult<()> {
        match like_type {
            LikeTarget::Post => {
                self.post_repo
                    .adjust_like_count(target_id, delta, None)
                    .await?;
            }
            LikeTarget::Comment => {
                self.comment_repo
                    .adjust_like_count(target_id, delta, None)
                    .await?;
            }
        }
        Ok(())
    }
}
