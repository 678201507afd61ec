//! User repository.

use bson::oid::ObjectId;
use mongodb::ClientSession;

use scribe_core::result::AppResult;
use scribe_core::types::{PageQuery, Paginated, Predicate, Relation};
use scribe_entity::User;

use crate::filter::FilterSpec;
use crate::repository::{CollectionSpec, CountSummary, MongoRepository};

const SPEC: CollectionSpec = CollectionSpec {
    searchable_fields: &["firstName", "lastName", "email"],
    sortable_fields: &["firstName", "lastName", "email", "createdAt", "updatedAt"],
    default_sort_field: "createdAt",
    default_joins: &[],
};

/// Repository for user CRUD and query operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    base: MongoRepository<User>,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(database: &mongodb::Database) -> Self {
        Self {
            base: MongoRepository::new(database, SPEC),
        }
    }

    /// The underlying generic repository.
    pub fn base(&self) -> &MongoRepository<User> {
        &self.base
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: ObjectId) -> AppResult<Option<User>> {
        self.base.find_one_by_id(id, None).await
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.base
            .find_one(FilterSpec::with_base(Predicate::eq("email", email)), None)
            .await
    }

    /// Find a user by phone number.
    pub async fn find_by_phone(&self, phone: &str) -> AppResult<Option<User>> {
        self.base
            .find_one(
                FilterSpec::with_base(Predicate::eq("phoneNumber", phone)),
                None,
            )
            .await
    }

    /// Find a user holding the given password-reset token.
    pub async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>> {
        self.base
            .find_one(
                FilterSpec::with_base(Predicate::eq("passwordResetToken", token)),
                None,
            )
            .await
    }

    /// Check whether an email is already taken.
    pub async fn email_taken(&self, email: &str) -> AppResult<bool> {
        self.base
            .exists(FilterSpec::with_base(Predicate::eq("email", email)))
            .await
    }

    /// Check whether a phone number is already taken.
    pub async fn phone_taken(&self, phone: &str) -> AppResult<bool> {
        self.base
            .exists(FilterSpec::with_base(Predicate::eq("phoneNumber", phone)))
            .await
    }

    /// Paginated user listing over active accounts.
    pub async fn paginate(&self, query: &PageQuery) -> AppResult<Paginated<User>> {
        self.base
            .paginate(
                query,
                FilterSpec::with_base(Predicate::eq("isActive", true)),
                Relation::None,
            )
            .await
    }

    /// Apply a patch to a user and return the new version.
    pub async fn update_by_id(
        &self,
        id: ObjectId,
        patch: bson::Document,
        session: Option<&mut ClientSession>,
    ) -> AppResult<Option<User>> {
        self.base.update_one_by_id(id, patch, session).await
    }

    /// Count users grouped by role.
    pub async fn counts_by_role(&self) -> AppResult<CountSummary> {
        self.base
            .grouped_counts(Some("role"), FilterSpec::active())
            .await
    }
}
