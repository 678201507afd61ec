//! Profile management and user administration.

use std::sync::Arc;

use bson::doc;
use bson::oid::ObjectId;
use serde::Deserialize;
use tracing::info;

use scribe_core::error::AppError;
use scribe_core::result::AppResult;
use scribe_core::types::{PageQuery, Paginated};
use scribe_database::repository::CountSummary;
use scribe_database::repositories::UserRepository;
use scribe_entity::User;

use crate::context::RequestContext;
use crate::session::SessionService;

/// Profile fields a user may change about themselves.
///
/// `None` leaves a field untouched; `avatar: Some(None)` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    #[serde(default, with = "double_option")]
    pub avatar: Option<Option<String>>,
}

/// Serde helper distinguishing an absent field from an explicit null.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(de).map(Some)
    }
}

/// Manages user profiles and account state.
#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
    sessions: Arc<SessionService>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(user_repo: Arc<UserRepository>, sessions: Arc<SessionService>) -> Self {
        Self {
            user_repo,
            sessions,
        }
    }

    /// Fetches the authenticated user's own profile.
    pub async fn get_profile(&self, ctx: &RequestContext) -> AppResult<User> {
        self.user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Fetches a user by ID.
    pub async fn get_by_id(&self, id: ObjectId) -> AppResult<User> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Applies a partial profile update to the authenticated user.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        request: UpdateProfileRequest,
    ) -> AppResult<User> {
        let mut set = doc! {};
        let mut unset = doc! {};

        if let Some(first_name) = request.first_name {
            let first_name = first_name.trim().to_string();
            if first_name.is_empty() {
                return Err(AppError::validation("First name cannot be empty"));
            }
            set.insert("firstName", first_name);
        }
        if let Some(last_name) = request.last_name {
            let last_name = last_name.trim().to_string();
            if last_name.is_empty() {
                return Err(AppError::validation("Last name cannot be empty"));
            }
            set.insert("lastName", last_name);
        }
        if let Some(address) = request.address {
            set.insert("address", address.trim().to_string());
        }
        match request.avatar {
            Some(Some(url)) => {
                set.insert("avatar", url);
            }
            Some(None) => {
                unset.insert("avatar", "");
            }
            None => {}
        }

        if set.is_empty() && unset.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }
        set.insert("updatedBy", ctx.user_id);

        let mut patch = doc! { "$set": set };
        if !unset.is_empty() {
            patch.insert("$unset", unset);
        }

        self.user_repo
            .update_by_id(ctx.user_id, patch, None)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Paginated listing of active users (admin only).
    pub async fn list(
        &self,
        ctx: &RequestContext,
        query: &PageQuery,
    ) -> AppResult<Paginated<User>> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin access required"));
        }
        self.user_repo.paginate(query).await
    }

    /// Deactivates an account and revokes all of its sessions.
    ///
    /// Users may deactivate themselves; admins may deactivate anyone.
    pub async fn deactivate(&self, ctx: &RequestContext, target: ObjectId) -> AppResult<()> {
        if target != ctx.user_id && !ctx.is_admin() {
            return Err(AppError::authorization(
                "Only admins can deactivate other accounts",
            ));
        }

        let updated = self
            .user_repo
            .update_by_id(
                target,
                doc! { "$set": { "isActive": false, "updatedBy": ctx.user_id } },
                None,
            )
            .await?;
        if updated.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        self.sessions.revoke_all(target, Some(ctx.user_id)).await?;
        info!(user_id = %target, by = %ctx.user_id, "Account deactivated");
        Ok(())
    }

    /// Reactivates a deactivated account (admin only).
    pub async fn reactivate(&self, ctx: &RequestContext, target: ObjectId) -> AppResult<User> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin access required"));
        }
        let user = self
            .user_repo
            .update_by_id(
                target,
                doc! { "$set": { "isActive": true, "updatedBy": ctx.user_id } },
                None,
            )
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        info!(user_id = %target, by = %ctx.user_id, "Account reactivated");
        Ok(user)
    }

    /// User counts grouped by role (admin only).
    pub async fn counts_by_role(&self, ctx: &RequestContext) -> AppResult<CountSummary> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Admin access required"));
        }
        self.user_repo.counts_by_role().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_absent_vs_null() {
        let absent: UpdateProfileRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(absent.avatar, None);

        let null: UpdateProfileRequest = serde_json::from_str(r#"{"avatar": null}"#).unwrap();
        assert_eq!(null.avatar, Some(None));

        let set: UpdateProfileRequest =
            serde_json::from_str(r#"{"avatar": "https://cdn/x.png"}"#).unwrap();
        assert_eq!(set.avatar, Some(Some("https://cdn/x.png".into())));
    }
}
