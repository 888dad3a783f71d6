use axum::{Json, extract::State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::profile::{ProfileResponse, UpdateProfileRequest, validate_profile_update};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/user/profile",
    tag = "Profile",
    operation_id = "getProfile",
    summary = "Get the signed-in user's profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = auth_user.account(&state.db).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/user/profile",
    tag = "Profile",
    operation_id = "updateProfile",
    summary = "Update the signed-in user's profile",
    description = "Only fields present in the body change. An empty string clears an optional \
        field. A new username must be free.",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Username already registered (USERNAME_TAKEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn update_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let changes = validate_profile_update(payload)?;
    let user = auth_user.account(&state.db).await?;

    if let Some(username) = &changes.username
        && *username != user.username
    {
        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(username.as_str()))
            .one(&state.db)
            .await?
            .is_some();
        if taken {
            return Err(AppError::UsernameTaken);
        }
    }

    let mut active: user::ActiveModel = user.into();
    if let Some(username) = changes.username {
        active.username = Set(username);
    }
    if let Some(email) = changes.email {
        active.email = Set(email);
    }
    if let Some(full_name) = changes.full_name {
        active.full_name = Set(full_name);
    }
    if let Some(bio) = changes.bio {
        active.bio = Set(bio);
    }
    if let Some(location) = changes.location {
        active.location = Set(location);
    }

    if !active.is_changed() {
        return Ok(Json(active.try_into_model()?.into()));
    }

    let updated = active.update(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::UsernameTaken,
        _ => AppError::from(e),
    })?;

    tracing::info!("Updated profile");
    Ok(Json(updated.into()))
}
