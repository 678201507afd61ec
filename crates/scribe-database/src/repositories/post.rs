//! Post repository.

use bson::oid::ObjectId;
use bson::{Document, doc};
use mongodb::ClientSession;

use scribe_core::result::AppResult;
use scribe_core::types::{Join, PageQuery, Paginated, Predicate, Relation};
use scribe_entity::{Post, PostStatus};

use crate::filter::FilterSpec;
use crate::repository::{CollectionSpec, CountSummary, MongoRepository};
use crate::views::PostWithAuthor;

/// Fields the default author join projects from the users collection.
const AUTHOR_SELECT: &[&str] = &["_id", "firstName", "lastName", "email", "avatar"];

const SPEC: CollectionSpec = CollectionSpec {
    searchable_fields: &["content", "slug", "tags"],
    sortable_fields: &["publishedAt", "createdAt", "viewCount"],
    default_sort_field: "createdAt",
    default_joins: &[Join {
        from: "users",
        local_field: "author",
        foreign_field: "_id",
        as_field: "author",
        select: Some(AUTHOR_SELECT),
    }],
};

/// Repository for post CRUD and query operations.
#[derive(Debug, Clone)]
pub struct PostRepository {
    base: MongoRepository<Post>,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(database: &mongodb::Database) -> Self {
        Self {
            base: MongoRepository::new(database, SPEC),
        }
    }

    /// The underlying generic repository.
    pub fn base(&self) -> &MongoRepository<Post> {
        &self.base
    }

    /// Find a post by primary key.
    pub async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Post>> {
        self.base.find_one_by_id(id, None).await
    }

    /// Find a post by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Post>> {
        self.base
            .find_one(FilterSpec::with_base(Predicate::eq("slug", slug)), None)
            .await
    }

    /// Check whether a slug is already taken.
    pub async fn slug_taken(&self, slug: &str) -> AppResult<bool> {
        self.base
            .exists(FilterSpec::with_base(Predicate::eq("slug", slug)))
            .await
    }

    /// Paginated listing with the author embedded.
    pub async fn paginate_with_author(
        &self,
        query: &PageQuery,
        filter: FilterSpec,
    ) -> AppResult<Paginated<PostWithAuthor>> {
        self.base.paginate(query, filter, Relation::Default).await
    }

    /// Paginated listing of published posts.
    pub async fn paginate_published(
        &self,
        query: &PageQuery,
    ) -> AppResult<Paginated<PostWithAuthor>> {
        self.paginate_with_author(
            query,
            FilterSpec::with_base(Predicate::eq("status", PostStatus::Published.as_str())),
        )
        .await
    }

    /// Paginated listing of one author's posts.
    pub async fn paginate_by_author(
        &self,
        author: ObjectId,
        query: &PageQuery,
    ) -> AppResult<Paginated<PostWithAuthor>> {
        self.paginate_with_author(query, FilterSpec::with_base(Predicate::eq("author", author)))
            .await
    }

    /// Paginated listing of published posts carrying a tag.
    pub async fn paginate_by_tag(
        &self,
        tag: &str,
        query: &PageQuery,
    ) -> AppResult<Paginated<PostWithAuthor>> {
        let filter = Predicate::eq("status", PostStatus::Published.as_str())
            .and(Predicate::eq("tags", tag));
        self.paginate_with_author(query, FilterSpec::with_base(filter))
            .await
    }

    /// Apply a patch to a post and return the new version.
    pub async fn update_by_id(
        &self,
        id: ObjectId,
        patch: Document,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<Post>> {
        self.base.update_one_by_id(id, patch, session).await
    }

    /// Atomically bump the view counter.
    pub async fn increment_views(&self, id: ObjectId) -> AppResult<Option<Post>> {
        self.base
            .update_one_by_id(id, doc! { "$inc": { "viewCount": 1 } }, None)
            .await
    }

    /// Atomically adjust the like counter.
    pub async fn adjust_like_count(
        &self,
        id: ObjectId,
        delta: i64,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<Post>> {
        self.base
            .update_one_by_id(id, doc! { "$inc": { "likeCount": delta } }, session)
            .await
    }

    /// Atomically adjust the comment counter.
    pub async fn adjust_comment_count(
        &self,
        id: ObjectId,
        delta: i64,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<Post>> {
        self.base
            .update_one_by_id(id, doc! { "$inc": { "commentCount": delta } }, session)
            .await
    }

    /// Count posts grouped by status.
    pub async fn counts_by_status(&self) -> AppResult<CountSummary> {
        self.base
            .grouped_counts(Some("status"), FilterSpec::active())
            .await
    }
}
