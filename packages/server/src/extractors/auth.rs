use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::{ConnectionTrait, EntityTrait};

use crate::entity::user;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. Only the token
/// is checked here; call [`AuthUser::account`] to require a live account.
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
}

impl AuthUser {
    /// Load the account behind the token. A token for a deleted account is invalid.
    pub async fn account<C: ConnectionTrait>(&self, db: &C) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(self.user_id)
            .one(db)
            .await?
            .ok_or(AppError::TokenInvalid)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthUser {
            user_id: claims.uid,
            username: claims.sub,
        })
    }
}
