use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Form body shared by registration and login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct Credentials {
    /// Username (1-32 chars, alphanumeric and underscores).
    #[schema(example = "chaz_seitz")]
    pub username: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

/// Validate a username the way registration does. Returns it trimmed.
pub fn validate_username(username: &str) -> Result<&str, AppError> {
    let username = username.trim();
    if username.is_empty() || username.chars().count() > 32 {
        return Err(AppError::Validation(
            "Username must be 1-32 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AppError::Validation(
            "Username must contain only letters, digits, and underscores".into(),
        ));
    }
    Ok(username)
}

pub fn validate_register_request(payload: &Credentials) -> Result<(), AppError> {
    validate_username(&payload.username)?;
    if payload.password.len() < 8 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_login_request(payload: &Credentials) -> Result<(), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful registration response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
    /// ID of the newly created user.
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "chaz_seitz")]
    pub username: String,
}

impl From<crate::entity::user::Model> for RegisterResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            message: "User created successfully".into(),
            id: user.id,
            username: user.username,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Always `bearer`.
    #[schema(example = "bearer")]
    pub token_type: String,
}

/// Response of the authentication probe.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProtectedResponse {
    /// Username carried by the token.
    #[schema(example = "chaz_seitz")]
    pub user: String,
    #[schema(example = "You are authenticated")]
    pub message: String,
}
