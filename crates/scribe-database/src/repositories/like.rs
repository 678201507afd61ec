//! Like repository.

use bson::oid::ObjectId;
use mongodb::ClientSession;

use scribe_core::result::AppResult;
use scribe_core::types::{PageQuery, Paginated, Predicate, Relation};
use scribe_entity::{Like, LikeTarget};

use crate::filter::FilterSpec;
use crate::repository::{CollectionSpec, MongoRepository};

const SPEC: CollectionSpec = CollectionSpec {
    searchable_fields: &[],
    sortable_fields: &["createdAt"],
    default_sort_field: "createdAt",
    default_joins: &[],
};

/// Repository for like CRUD and query operations.
#[derive(Debug, Clone)]
pub struct LikeRepository {
    base: MongoRepository<Like>,
}

impl LikeRepository {
    /// Create a new like repository.
    pub fn new(database: &mongodb::Database) -> Self {
        Self {
            base: MongoRepository::new(database, SPEC),
        }
    }

    /// The underlying generic repository.
    pub fn base(&self) -> &MongoRepository<Like> {
        &self.base
    }

    /// Find the like a user placed on a target, if any.
    pub async fn find_for(
        &self,
        user: ObjectId,
        target_id: ObjectId,
        like_type: LikeTarget,
    ) -> AppResult<Option<Like>> {
        let key = Like::unique_key(user, target_id, like_type);
        self.base
            .find_one(FilterSpec::with_base(Predicate::eq("uniqueKey", key)), None)
            .await
    }

    /// Check whether a user has liked a target.
    pub async fn exists_for(
        &self,
        user: ObjectId,
        target_id: ObjectId,
        like_type: LikeTarget,
    ) -> AppResult<bool> {
        let key = Like::unique_key(user, target_id, like_type);
        self.base
            .exists(FilterSpec::with_base(Predicate::eq("uniqueKey", key)))
            .await
    }

    /// Count active likes on a target.
    pub async fn count_for_target(
        &self,
        target_id: ObjectId,
        like_type: LikeTarget,
    ) -> AppResult<u64> {
        let filter = Predicate::eq("targetId", target_id)
            .and(Predicate::eq("likeType", like_type.as_str()));
        self.base.count(FilterSpec::with_base(filter)).await
    }

    /// Paginated listing of the likes on a target.
    pub async fn paginate_for_target(
        &self,
        target_id: ObjectId,
        like_type: LikeTarget,
        query: &PageQuery,
    ) -> AppResult<Paginated<Like>> {
        let filter = Predicate::eq("targetId", target_id)
            .and(Predicate::eq("likeType", like_type.as_str()));
        self.base
            .paginate(query, FilterSpec::with_base(filter), Relation::None)
            .await
    }

    /// Remove a user's like on a target. Physical removal keeps the
    /// unique key free for a later re-like.
    pub async fn remove_for(
        &self,
        user: ObjectId,
        target_id: ObjectId,
        like_type: LikeTarget,
        session: Option<&mut ClientSession>,
    ) -> AppResult<bool> {
        let key = Like::unique_key(user, target_id, like_type);
        self.base
            .delete(Predicate::eq("uniqueKey", key), session)
            .await
    }
}
