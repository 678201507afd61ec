//! Session repository.

use bson::DateTime;
use bson::oid::ObjectId;
use mongodb::ClientSession;

use scribe_core::result::AppResult;
use scribe_core::types::Predicate;
use scribe_entity::Session;

use crate::filter::FilterSpec;
use crate::repository::{CollectionSpec, MongoRepository};

const SPEC: CollectionSpec = CollectionSpec {
    searchable_fields: &[],
    sortable_fields: &["createdAt", "expiresAt"],
    default_sort_field: "createdAt",
    default_joins: &[],
};

/// Repository for refresh-token sessions.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    base: MongoRepository<Session>,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(database: &mongodb::Database) -> Self {
        Self {
            base: MongoRepository::new(database, SPEC),
        }
    }

    /// The underlying generic repository.
    pub fn base(&self) -> &MongoRepository<Session> {
        &self.base
    }

    /// Find a live session by primary key.
    pub async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<Session>> {
        self.base.find_one_by_id(id, None).await
    }

    /// Find a live session by its refresh token.
    pub async fn find_by_refresh_token(&self, token: &str) -> AppResult<Option<Session>> {
        self.base
            .find_one(
                FilterSpec::with_base(Predicate::eq("refreshToken", token)),
                None,
            )
            .await
    }

    /// List a user's live sessions.
    pub async fn find_for_user(&self, user_id: ObjectId) -> AppResult<Vec<Session>> {
        self.base
            .find(
                FilterSpec::with_base(Predicate::eq("userId", user_id)),
                Some(bson::doc! { "createdAt": -1 }),
            )
            .await
    }

    /// Revoke a single session.
    pub async fn revoke(
        &self,
        id: ObjectId,
        revoked_by: Option<ObjectId>,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<Session>> {
        self.base.soft_delete_by_id(id, revoked_by, session).await
    }

    /// Revoke every session belonging to a user, returning the count.
    pub async fn revoke_all_for_user(
        &self,
        user_id: ObjectId,
        revoked_by: Option<ObjectId>,
    ) -> AppResult<u64> {
        let now = DateTime::now();
        let mut set = bson::doc! { "deleted": true, "deletedAt": now };
        if let Some(by) = revoked_by {
            set.insert("deletedBy", by);
        }
        self.base
            .update_many(Predicate::eq("userId", user_id), bson::doc! { "$set": set }, None)
            .await
    }

    /// Physically remove sessions that expired before the cutoff.
    pub async fn delete_expired(&self, cutoff: DateTime) -> AppResult<u64> {
        self.base
            .delete_many(
                Predicate::Range {
                    field: "expiresAt".into(),
                    gte: None,
                    lt: Some(cutoff.into()),
                },
                None,
            )
            .await
    }
}
