use serde::Serialize;

use crate::error::AppError;

/// Plain acknowledgement body.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Product deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Trim a required text field, rejecting blanks and anything over `max` characters.
pub fn require_text(value: &str, name: &str, max: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{name} must be at most {max} characters"
        )));
    }
    Ok(value.to_string())
}
