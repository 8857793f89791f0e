//! Request Extractors
//!
//! Resolves the caller's identity from the `Authorization` header against
//! the record store. Every private route takes [`CurrentUser`]; admin-only
//! routes additionally call [`require_admin`].

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::auth::bearer_value;
use crate::store::types::{Role, User};

/// The authenticated caller and the token it presented
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthenticated("Missing Authorization header".to_string())
            })?;

        let token = bearer_value(header).ok_or_else(|| {
            ApiError::Unauthenticated("Expected a bearer token".to_string())
        })?;

        let user = state
            .store
            .user_for_token(token)?
            .ok_or_else(|| ApiError::Unauthenticated("Invalid token".to_string()))?;

        Ok(CurrentUser {
            user,
            token: token.to_string(),
        })
    }
}

/// Reject callers without the admin role
pub fn require_admin(user: &User) -> Result<(), ApiError> {
    if user.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "User {} does not have the admin role",
            user.id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn require_admin_rejects_regular_users() {
        let user = User {
            id: 1,
            name: "Alice".to_string(),
            email: "a@example.com".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        };
        assert!(require_admin(&user).is_err());

        let admin = User {
            role: Role::Admin,
            ..user
        };
        assert!(require_admin(&admin).is_ok());
    }
}
