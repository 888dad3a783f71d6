//! Product listings and the rules for reading listings written under older schemas.
//!
//! Listings are persisted as JSON objects. Early listings carried a separate
//! `email` or `instagram` key; current listings carry a single `contact` string
//! such as `email:someone@usf.edu` or `instagram:handle`. [`StoredProduct`] is the
//! only place that looks at raw keys to tell the two apart.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const CONTACT_KEY: &str = "contact";
pub const LEGACY_EMAIL_KEY: &str = "email";
pub const LEGACY_INSTAGRAM_KEY: &str = "instagram";

/// A stored listing that cannot be read as a product.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedRecord {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("expected a JSON object")]
    NotAnObject,
}

/// A listing in canonical shape.
///
/// Text fields missing from a stored object read as empty strings. Keys outside
/// the canonical set are kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    pub contact: String,
    /// RFC 3339 timestamp. Absent on listings created before it was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Serialize to the JSON text stored for this listing.
    pub fn to_blob(&self) -> String {
        Value::Object(self.to_fields()).to_string()
    }

    fn to_fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields,
            // A struct of strings and a string map always serializes to an object.
            _ => Map::new(),
        }
    }

    /// Lowercased text that search queries are matched against.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.category).to_lowercase()
    }
}

/// A raw stored listing, classified by schema vintage.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredProduct {
    /// Has a non-null `contact`. Any other keys are left as stored.
    Canonical(Map<String, Value>),
    /// Predates `contact`.
    Legacy(LegacyProduct),
}

/// A listing written before `contact` existed.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyProduct {
    /// Non-empty `email` string, if any.
    pub email: Option<String>,
    /// Non-empty `instagram` string, if any.
    pub instagram: Option<String>,
    fields: Map<String, Value>,
}

impl LegacyProduct {
    /// The `contact` string this listing would have been written with.
    pub fn derived_contact(&self) -> String {
        contact_for(self.email.as_deref(), self.instagram.as_deref())
    }
}

/// Build a contact string from legacy fields.
///
/// Email wins over instagram. With neither, the result is the bare `email:` prefix.
pub fn contact_for(email: Option<&str>, instagram: Option<&str>) -> String {
    match (email, instagram) {
        (Some(email), _) if !email.is_empty() => format!("email:{email}"),
        (_, Some(handle)) if !handle.is_empty() => format!("instagram:{handle}"),
        _ => "email:".to_string(),
    }
}

impl StoredProduct {
    /// Parse stored JSON text.
    pub fn decode(raw: &str) -> Result<Self, MalformedRecord> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| MalformedRecord::InvalidJson(e.to_string()))?;
        match value {
            Value::Object(fields) => Ok(Self::from_fields(fields)),
            _ => Err(MalformedRecord::NotAnObject),
        }
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        match fields.get(CONTACT_KEY) {
            Some(contact) if !contact.is_null() => Self::Canonical(fields),
            _ => Self::Legacy(LegacyProduct {
                email: non_empty_str(&fields, LEGACY_EMAIL_KEY),
                instagram: non_empty_str(&fields, LEGACY_INSTAGRAM_KEY),
                fields,
            }),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// Read-path normalization: guarantees `contact`, removes nothing.
    pub fn into_canonical(self) -> Map<String, Value> {
        match self {
            Self::Canonical(fields) => fields,
            Self::Legacy(legacy) => {
                let contact = legacy.derived_contact();
                let mut fields = legacy.fields;
                fields.insert(CONTACT_KEY.to_string(), Value::String(contact));
                fields
            }
        }
    }

    /// Batch-upgrade normalization: canonical fields with the legacy keys dropped.
    ///
    /// Returns `None` when the stored form is already reduced and needs no rewrite.
    pub fn upgraded(self) -> Option<Map<String, Value>> {
        if let Self::Canonical(fields) = &self
            && !has_legacy_keys(fields)
        {
            return None;
        }

        let mut fields = self.into_canonical();
        fields.remove(LEGACY_EMAIL_KEY);
        fields.remove(LEGACY_INSTAGRAM_KEY);
        Some(fields)
    }

    /// Read-path normalization into the typed view.
    ///
    /// Total: scalar values of the wrong type are read as their JSON text and
    /// `null` reads as missing.
    pub fn into_product(self) -> Product {
        let mut fields = self.into_canonical();
        let mut take = |key: &str| fields.remove(key).and_then(text_value);

        Product {
            title: take("title").unwrap_or_default(),
            price: take("price").unwrap_or_default(),
            description: take("description").unwrap_or_default(),
            category: take("category").unwrap_or_default(),
            image: take("image").unwrap_or_default(),
            contact: take(CONTACT_KEY).unwrap_or_default(),
            created_at: take("created_at"),
            extra: fields,
        }
    }
}

/// Normalize stored JSON text for a single read. Storage is not touched.
pub fn normalize(raw: &str) -> Result<Product, MalformedRecord> {
    Ok(StoredProduct::decode(raw)?.into_product())
}

/// Compute the rewritten JSON text for a stored listing, if it needs one.
pub fn upgrade(raw: &str) -> Result<Option<String>, MalformedRecord> {
    Ok(StoredProduct::decode(raw)?
        .upgraded()
        .map(|fields| Value::Object(fields).to_string()))
}

fn has_legacy_keys(fields: &Map<String, Value>) -> bool {
    fields.contains_key(LEGACY_EMAIL_KEY) || fields.contains_key(LEGACY_INSTAGRAM_KEY)
}

fn text_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn non_empty_str(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
