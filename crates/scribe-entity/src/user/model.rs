//! User entity model.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use scribe_core::traits::Entity;

use super::role::UserRole;

/// A registered user.
///
/// The password hash is persisted with the document but must never be
/// exposed through the API layer; response DTOs omit it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address (unique).
    pub email: String,
    /// Phone number (unique).
    pub phone_number: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// User role.
    pub role: UserRole,
    /// Avatar image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Whether the account is active (deactivation, not deletion).
    pub is_active: bool,
    /// Whether the email address has been verified.
    pub is_email_verified: bool,
    /// Outstanding password-reset token (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_reset_token: Option<String>,
    /// When the password-reset token expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_reset_expires: Option<DateTime>,
    /// Last successful login time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,

    // -- Audit block --
    /// When the user was created.
    pub created_at: DateTime,
    /// When the user was last updated.
    pub updated_at: DateTime,
    /// Who created the user, when an actor is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    /// Who last updated the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<ObjectId>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted: bool,
    /// When the user was soft-deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime>,
    /// Who soft-deleted the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<ObjectId>,
}

impl User {
    /// Create a new user with default role, flags, and audit stamps.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            password_hash: password_hash.into(),
            role: UserRole::User,
            avatar: None,
            address: String::new(),
            is_active: true,
            is_email_verified: false,
            password_reset_token: None,
            password_reset_expires: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
            created_by: None,
            updated_by: None,
            deleted: false,
            deleted_at: None,
            deleted_by: None,
        }
    }

    /// The user's full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.is_active && !self.deleted
    }
}

impl Entity for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> ObjectId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_defaults() {
        let user = User::new("Ada", "Lovelace", "ada@example.com", "+15550100", "$argon2...");
        assert_eq!(user.role, UserRole::User);
        assert!(user.is_active);
        assert!(!user.is_email_verified);
        assert!(!user.deleted);
        assert!(user.can_login());
    }

    #[test]
    fn bson_field_names_are_camel_case() {
        let user = User::new("Ada", "Lovelace", "ada@example.com", "+15550100", "h");
        let doc = bson::to_document(&user).unwrap();
        assert!(doc.contains_key("_id"));
        assert!(doc.contains_key("firstName"));
        assert!(doc.contains_key("phoneNumber"));
        assert!(doc.contains_key("isActive"));
        assert!(doc.contains_key("createdAt"));
        assert!(!doc.contains_key("deletedAt"));
    }
}
