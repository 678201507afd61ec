//! Post use cases: authoring, publishing lifecycle, and listings.

use std::sync::Arc;

use bson::DateTime;
use bson::doc;
use bson::oid::ObjectId;
use serde::Deserialize;
use tracing::info;

use scribe_core::error::AppError;
use scribe_core::result::AppResult;
use scribe_core::types::{PageQuery, Paginated};
use scribe_database::repositories::PostRepository;
use scribe_database::repository::CountSummary;
use scribe_database::views::PostWithAuthor;
use scribe_entity::{Post, PostStatus};

use crate::context::RequestContext;
use crate::post::slug::slugify;

/// Input for creating a post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Vec<String>,
    #[serde(default = "default_allow_comments")]
    pub allow_comments: bool,
}

fn default_allow_comments() -> bool {
    true
}

/// Partial update to a post. Absent fields are untouched;
/// `remove_featured_image` clears the image regardless of `featured_image`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<String>,
    #[serde(default)]
    pub remove_featured_image: bool,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<Vec<String>>,
    pub allow_comments: Option<bool>,
}

/// Manages the post lifecycle.
#[derive(Debug, Clone)]
pub struct PostService {
    post_repo: Arc<PostRepository>,
}

impl PostService {
    /// Creates a new post service.
    pub fn new(post_repo: Arc<PostRepository>) -> Self {
        Self { post_repo }
    }

    /// Creates a draft post, deriving a unique slug from the title.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: CreatePostRequest,
    ) -> AppResult<Post> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("Title cannot be empty"));
        }
        if request.content.trim().is_empty() {
            return Err(AppError::validation("Content cannot be empty"));
        }

        let slug = self.unique_slug(&title).await?;
        let mut post = Post::new(title, slug, request.content, ctx.user_id);
        post.tags = normalize_tags(request.tags);
        post.featured_image = request.featured_image;
        post.meta_description = request.meta_description;
        post.meta_keywords = request.meta_keywords;
        post.allow_comments = request.allow_comments;

        let post = self.post_repo.base().create(post, None).await?;
        info!(post_id = %post.id, author = %ctx.user_id, slug = %post.slug, "Post created");
        Ok(post)
    }

    /// Derives a slug from the title, suffixing a counter on collision.
    async fn unique_slug(&self, title: &str) -> AppResult<String> {
        let base = slugify(title);
        if base.is_empty() {
            return Err(AppError::validation(
                "Title must contain at least one alphanumeric character",
            ));
        }
        if !self.post_repo.slug_taken(&base).await? {
            return Ok(base);
        }
        for n in 2..100 {
            let candidate = format!("{base}-{n}");
            if !self.post_repo.slug_taken(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(AppError::conflict("Could not derive a unique slug"))
    }

    /// Fetches a post by ID.
    pub async fn get_by_id(&self, id: ObjectId) -> AppResult<Post> {
        self.post_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    /// Fetches a published post by slug and bumps its view counter.
    ///
    /// Drafts and archived posts resolve only for their author or an admin.
    pub async fn get_by_slug(
        &self,
        slug: &str,
        viewer: Option<&RequestContext>,
    ) -> AppResult<Post> {
        let post = self
            .post_repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        if !post.is_published() {
            let allowed = viewer
                .map(|ctx| post.is_owned_by(ctx.user_id) || ctx.is_admin())
                .unwrap_or(false);
            if !allowed {
                return Err(AppError::not_found("Post not found"));
            }
            return Ok(post);
        }

        // Counter bump is best-effort presentation state; the fetched
        // document is returned with the pre-bump count.
        self.post_repo.increment_views(post.id).await?;
        Ok(post)
    }

    /// Public listing of published posts, author embedded.
    pub async fn list_published(&self, query: &PageQuery) -> AppResult<Paginated<PostWithAuthor>> {
        self.post_repo.paginate_published(query).await
    }

    /// Published posts carrying a tag.
    pub async fn list_by_tag(
        &self,
        tag: &str,
        query: &PageQuery,
    ) -> AppResult<Paginated<PostWithAuthor>> {
        self.post_repo.paginate_by_tag(tag.trim(), query).await
    }

    /// All of one author's posts, any status (author or admin only).
    pub async fn list_by_author(
        &self,
        ctx: &RequestContext,
        author: ObjectId,
        query: &PageQuery,
    ) -> AppResult<Paginated<PostWithAuthor>> {
        if author != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::authorization(
                "Cannot list another author's unpublished posts",
            ));
        }
        self.post_repo.paginate_by_author(author, query).await
    }

    /// Applies a partial update. Title changes do not re-slug.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: ObjectId,
        request: UpdatePostRequest,
    ) -> AppResult<Post> {
        let post = self.get_owned(ctx, id).await?;

        let mut set = doc! {};
        let mut unset = doc! {};

        if let Some(title) = request.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::validation("Title cannot be empty"));
            }
            set.insert("title", title);
        }
        if let Some(content) = request.content {
            if content.trim().is_empty() {
                return Err(AppError::validation("Content cannot be empty"));
            }
            set.insert("content", content);
        }
        if let Some(tags) = request.tags {
            set.insert("tags", normalize_tags(tags));
        }
        if request.remove_featured_image {
            unset.insert("featuredImage", "");
        } else if let Some(image) = request.featured_image {
            set.insert("featuredImage", image);
        }
        if let Some(desc) = request.meta_description {
            set.insert("metaDescription", desc);
        }
        if let Some(keywords) = request.meta_keywords {
            set.insert("metaKeywords", keywords);
        }
        if let Some(allow) = request.allow_comments {
            set.insert("allowComments", allow);
        }

        if set.is_empty() && unset.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }
        set.insert("updatedBy", ctx.user_id);

        let mut patch = doc! { "$set": set };
        if !unset.is_empty() {
            patch.insert("$unset", unset);
        }

        self.post_repo
            .update_by_id(post.id, patch, None)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    /// Publishes a draft or archived post, stamping `publishedAt` once.
    pub async fn publish(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<Post> {
        let post = self.get_owned(ctx, id).await?;
        if post.status == PostStatus::Published {
            return Err(AppError::conflict("Post is already published"));
        }

        let mut set = doc! { "status": PostStatus::Published.as_str(), "updatedBy": ctx.user_id };
        if post.published_at.is_none() {
            set.insert("publishedAt", DateTime::now());
        }

        let post = self
            .post_repo
            .update_by_id(post.id, doc! { "$set": set }, None)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        info!(post_id = %post.id, by = %ctx.user_id, "Post published");
        Ok(post)
    }

    /// Returns a published post to draft.
    pub async fn unpublish(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<Post> {
        self.transition(ctx, id, PostStatus::Published, PostStatus::Draft)
            .await
    }

    /// Archives a post, removing it from public listings.
    pub async fn archive(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<Post> {
        let post = self.get_owned(ctx, id).await?;
        if post.status == PostStatus::Archived {
            return Err(AppError::conflict("Post is already archived"));
        }
        let post = self
            .post_repo
            .update_by_id(
                post.id,
                doc! { "$set": { "status": PostStatus::Archived.as_str(), "updatedBy": ctx.user_id } },
                None,
            )
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        info!(post_id = %post.id, by = %ctx.user_id, "Post archived");
        Ok(post)
    }

    /// Soft-deletes a post (owner or admin).
    pub async fn delete(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<()> {
        let post = self.get_owned(ctx, id).await?;
        self.post_repo
            .base()
            .soft_delete_by_id(post.id, Some(ctx.user_id), None)
            .await?;
        info!(post_id = %post.id, by = %ctx.user_id, "Post deleted");
        Ok(())
    }

    /// Post counts grouped by status (admin only).
    pub async fn counts_by_status(&self, ctx: &RequestContext) -> AppResult<CountSummary> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin access required"));
        }
        self.post_repo.counts_by_status().await
    }

    async fn get_owned(&self, ctx: &RequestContext, id: ObjectId) -> AppResult<Post> {
        let post = self.get_by_id(id).await?;
        if !post.is_owned_by(ctx.user_id) && !ctx.is_admin() {
            return Err(AppError::authorization(
                "Only the author or an admin may modify this post",
            ));
        }
        Ok(post)
    }

    async fn transition(
        &self,
        ctx: &RequestContext,
        id: ObjectId,
        from: PostStatus,
        to: PostStatus,
    ) -> AppResult<Post> {
        let post = self.get_owned(ctx, id).await?;
        if post.status != from {
            return Err(AppError::conflict(format!(
                "Post is not {}",
                from.as_str().to_lowercase()
            )));
        }
        let post = self
            .post_repo
            .update_by_id(
                post.id,
                doc! { "$set": { "status": to.as_str(), "updatedBy": ctx.user_id } },
                None,
            )
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        info!(post_id = %post.id, by = %ctx.user_id, status = to.as_str(), "Post status changed");
        Ok(post)
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_lowercased_and_deduplicated() {
        let tags = normalize_tags(vec![
            "Rust".into(),
            " rust ".into(),
            "".into(),
            "Async".into(),
        ]);
        assert_eq!(tags, vec!["rust", "async"]);
    }
}
