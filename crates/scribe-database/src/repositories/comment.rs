//! Comment repository.

use bson::oid::ObjectId;
use bson::{Document, doc};
use mongodb::ClientSession;

use scribe_core::result::AppResult;
use scribe_core::types::{Join, PageQuery, Paginated, Predicate, Relation};
use scribe_entity::{Comment, CommentStatus};

use crate::filter::FilterSpec;
use crate::repository::{CollectionSpec, MongoRepository};
use crate::views::CommentWithAuthor;

const AUTHOR_SELECT: &[&str] = &["_id", "firstName", "lastName", "email", "avatar"];

const SPEC: CollectionSpec = CollectionSpec {
    searchable_fields: &["content"],
    sortable_fields: &["createdAt", "likeCount"],
    default_sort_field: "createdAt",
    default_joins: &[Join {
        from: "users",
        local_field: "author",
        foreign_field: "_id",
        as_field: "author",
        select: Some(AUTHOR_SELECT),
    }],
};

/// Repository for comment CRUD and query operations.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    base: MongoRepository<Comment>,
}

impl CommentRepository {
    /// Create a new comment repository.
    pub fn new(database: &mongodb::Database) -> Self {
        Self {
            base: MongoRepository::new(database, SPEC),
        }
    }

    /// The underlying generic repository.
    pub fn base(&self) -> &MongoRepository<Comment> {
        &self.base
    }

    /// Find a comment by primary key.
    pub async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Comment>> {
        self.base.find_one_by_id(id, None).await
    }

    /// Paginated listing of a post's active top-level comments, authors
    /// embedded.
    pub async fn paginate_for_post(
        &self,
        post: ObjectId,
        query: &PageQuery,
    ) -> AppResult<Paginated<CommentWithAuthor>> {
        let filter = Predicate::eq("post", post)
            .and(Predicate::eq("status", CommentStatus::Active.as_str()))
            .and(Predicate::eq("parent", bson::Bson::Null));
        self.base
            .paginate(query, FilterSpec::with_base(filter), Relation::Default)
            .await
    }

    /// Paginated listing of one author's comments.
    pub async fn paginate_by_author(
        &self,
        author: ObjectId,
        query: &PageQuery,
    ) -> AppResult<Paginated<CommentWithAuthor>> {
        self.base
            .paginate(
                query,
                FilterSpec::with_base(Predicate::eq("author", author)),
                Relation::Default,
            )
            .await
    }

    /// Paginated listing of a comment's direct replies.
    pub async fn paginate_replies(
        &self,
        parent: ObjectId,
        query: &PageQuery,
    ) -> AppResult<Paginated<CommentWithAuthor>> {
        let filter = Predicate::eq("parent", parent)
            .and(Predicate::eq("status", CommentStatus::Active.as_str()));
        self.base
            .paginate(query, FilterSpec::with_base(filter), Relation::Default)
            .await
    }

    /// Apply a patch to a comment and return the new version.
    pub async fn update_by_id(
        &self,
        id: ObjectId,
        patch: Document,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<Comment>> {
        self.base.update_one_by_id(id, patch, session).await
    }

    /// Atomically adjust the like counter.
    pub async fn adjust_like_count(
        &self,
        id: ObjectId,
        delta: i64,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<Comment>> {
        self.base
            .update_one_by_id(id, doc! { "$inc": { "likeCount": delta } }, session)
            .await
    }

    /// Atomically adjust the reply counter.
    pub async fn adjust_reply_count(
        &self,
        id: ObjectId,
        delta: i64,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<Comment>> {
        self.base
            .update_one_by_id(id, doc! { "$inc": { "replyCount": delta } }, session)
            .await
    }
}
