use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::user;
use crate::error::AppError;
use crate::models::auth::validate_username;

/// The signed-in user's profile.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "chaz_seitz")]
    pub username: String,
    #[schema(example = "chaz@usf.edu")]
    pub email: Option<String>,
    #[schema(example = "Chaz Seitz")]
    pub full_name: Option<String>,
    pub bio: Option<String>,
    #[schema(example = "Tampa, FL")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for ProfileResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            bio: user.bio,
            location: user.location,
            created_at: user.created_at,
        }
    }
}

/// Profile update. Absent fields are left alone; an empty string clears an
/// optional field.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    #[schema(example = "chaz_seitz")]
    pub username: Option<String>,
    #[schema(example = "chaz@usf.edu")]
    pub email: Option<String>,
    #[schema(example = "Chaz Seitz")]
    pub full_name: Option<String>,
    pub bio: Option<String>,
    #[schema(example = "Tampa, FL")]
    pub location: Option<String>,
}

/// A validated profile update.
///
/// Outer `None` leaves a column untouched; `Some(None)` clears it.
#[derive(Debug, Default, PartialEq)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<Option<String>>,
    pub full_name: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub location: Option<Option<String>>,
}

pub fn validate_profile_update(payload: UpdateProfileRequest) -> Result<ProfileChanges, AppError> {
    let username = payload
        .username
        .as_deref()
        .map(validate_username)
        .transpose()?
        .map(str::to_string);

    let email = optional_text(payload.email, "Email", 254)?;
    if let Some(Some(email)) = &email
        && !looks_like_email(email)
    {
        return Err(AppError::Validation("Email address is not valid".into()));
    }

    Ok(ProfileChanges {
        username,
        email,
        full_name: optional_text(payload.full_name, "Full name", 100)?,
        bio: optional_text(payload.bio, "Bio", 500)?,
        location: optional_text(payload.location, "Location", 100)?,
    })
}

fn optional_text(
    value: Option<String>,
    name: &str,
    max: usize,
) -> Result<Option<Option<String>>, AppError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let value = value.trim();
    if value.is_empty() {
        return Ok(Some(None));
    }
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{name} must be at most {max} characters"
        )));
    }
    Ok(Some(Some(value.to_string())))
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}
