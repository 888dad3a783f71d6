use common::product::{LEGACY_EMAIL_KEY, LEGACY_INSTAGRAM_KEY};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{Listing, NewProduct};
use crate::error::AppError;
use crate::models::shared::require_text;

/// A product listing as served to clients.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ProductResponse {
    #[schema(example = "1")]
    pub id: String,
    #[schema(example = "EGN lab kit")]
    pub title: String,
    /// Free-form price text.
    #[schema(example = "free")]
    pub price: String,
    pub description: String,
    #[schema(example = "project kit")]
    pub category: String,
    /// Uploaded filename (served under `/uploads/`) or an absolute URL.
    #[schema(example = "3f1c7a52-8d7e-4bb4-9a55-0c3a5d1f2e11.jpg")]
    pub image: String,
    /// `email:<address>` or `instagram:<handle>`.
    #[schema(example = "email:seller@usf.edu")]
    pub contact: String,
    /// RFC 3339 creation time, absent on listings imported without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Unrecognized stored keys, passed through untouched.
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

impl From<Listing> for ProductResponse {
    fn from(listing: Listing) -> Self {
        let p = listing.product;
        let mut extra = p.extra;
        extra.remove(LEGACY_EMAIL_KEY);
        extra.remove(LEGACY_INSTAGRAM_KEY);
        Self {
            id: listing.id,
            title: p.title,
            price: p.price,
            description: p.description,
            category: p.category,
            image: p.image,
            contact: p.contact,
            created_at: p.created_at,
            extra,
        }
    }
}

/// Response for a newly created listing.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CreateProductResponse {
    #[schema(example = "Product created successfully")]
    pub message: String,
    #[schema(example = "3f1c7a52-8d7e-4bb4-9a55-0c3a5d1f2e11")]
    pub product_id: String,
}

/// Query parameters for product search.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive text matched against title, description and category.
    /// Blank or absent returns every listing.
    pub query: Option<String>,
}

/// Text fields collected from a multipart product upload.
#[derive(Default)]
pub struct ProductForm {
    pub title: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub contact: Option<String>,
}

impl ProductForm {
    /// Store a named multipart text field. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "title" => &mut self.title,
            "price" => &mut self.price,
            "description" => &mut self.description,
            "category" => &mut self.category,
            "contact" => &mut self.contact,
            _ => return,
        };
        *slot = Some(value);
    }

    pub fn validate(self) -> Result<NewProduct, AppError> {
        Ok(NewProduct {
            title: require_text(&required(self.title, "title")?, "Title", 256)?,
            price: require_text(&required(self.price, "price")?, "Price", 64)?,
            description: require_text(
                &required(self.description, "description")?,
                "Description",
                5000,
            )?,
            category: require_text(&required(self.category, "category")?, "Category", 64)?,
            contact: require_text(&required(self.contact, "contact")?, "Contact", 256)?,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("Missing '{field}' field")))
}

/// Accept an external image link. Only absolute http(s) URLs are allowed.
pub fn validate_image_url(url: &str) -> Result<String, AppError> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !url.chars().any(char::is_whitespace) => {
            Ok(url.to_string())
        }
        _ => Err(AppError::Validation(
            "Photo must be an image file or an http(s) URL".into(),
        )),
    }
}
