use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::Product;
use common::product::normalize;
use common::storage::{ImageStore, StorageError};
use serde_json::Map;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::store::{RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("image storage failed: {0}")]
    Image(#[from] StorageError),
}

/// Fields a seller supplies for a new listing.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub contact: String,
}

/// Where a new listing's picture comes from.
#[derive(Debug, Clone)]
pub enum ProductImage {
    /// Uploaded bytes, stored as `<listing id><extension>`.
    Upload { extension: String, bytes: Vec<u8> },
    /// An external URL, stored as-is.
    Url(String),
}

/// A normalized listing together with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: String,
    pub product: Product,
}

/// Product listings read through the normalizer, plus their uploaded images.
#[derive(Clone)]
pub struct Catalog {
    records: Arc<dyn RecordStore>,
    images: Arc<dyn ImageStore>,
}

impl Catalog {
    pub fn new(records: Arc<dyn RecordStore>, images: Arc<dyn ImageStore>) -> Self {
        Self { records, images }
    }

    pub fn records(&self) -> &dyn RecordStore {
        &*self.records
    }

    pub fn images(&self) -> &dyn ImageStore {
        &*self.images
    }

    /// Store a new listing in canonical shape and return it with its generated id.
    pub async fn create(
        &self,
        new: NewProduct,
        image: ProductImage,
    ) -> Result<Listing, CatalogError> {
        let id = Uuid::new_v4().to_string();

        let (image, uploaded) = match image {
            ProductImage::Upload { extension, bytes } => {
                let name = format!("{id}{extension}");
                self.images.put(&name, &bytes).await?;
                (name.clone(), Some(name))
            }
            ProductImage::Url(url) => (url, None),
        };

        let product = Product {
            title: new.title,
            price: new.price,
            description: new.description,
            category: new.category,
            image,
            contact: new.contact,
            created_at: Some(Utc::now().to_rfc3339()),
            extra: Map::new(),
        };

        if let Err(e) = self.records.put(&id, &product.to_blob()).await {
            if let Some(name) = uploaded {
                self.release_image(&name).await;
            }
            return Err(e.into());
        }

        info!(id = %id, title = %product.title, "Created product");
        Ok(Listing { id, product })
    }

    /// Fetch one listing, normalized for this read only.
    pub async fn get(&self, id: &str) -> Result<Listing, CatalogError> {
        let blob = self.records.get(id).await?;
        let product = normalize(&blob).map_err(|e| StoreError::malformed(id, e))?;
        Ok(Listing {
            id: id.to_string(),
            product,
        })
    }

    /// All readable listings, newest first. Rows that fail to parse are skipped.
    pub async fn list(&self) -> Result<Vec<Listing>, CatalogError> {
        let rows = self.records.list_all().await?;
        let mut listings: Vec<Listing> = rows
            .into_iter()
            .filter_map(|(id, blob)| match normalize(&blob) {
                Ok(product) => Some(Listing { id, product }),
                Err(e) => {
                    warn!(id = %id, error = %e, "Skipping malformed product");
                    None
                }
            })
            .collect();

        listings.sort_by(newest_first);
        Ok(listings)
    }

    /// Listings whose title, description or category contain `query`, ignoring case.
    ///
    /// A missing or blank query returns everything.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<Listing>, CatalogError> {
        let listings = self.list().await?;
        let Some(needle) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return Ok(listings);
        };

        let needle = needle.to_lowercase();
        Ok(listings
            .into_iter()
            .filter(|listing| listing.product.search_text().contains(&needle))
            .collect())
    }

    /// Remove a listing, then its uploaded image if it has one.
    ///
    /// Image removal is best-effort: failures are logged, never returned.
    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        let blob = self.records.get(id).await?;
        let image = normalize(&blob).ok().map(|product| product.image);

        self.records.delete(id).await?;
        info!(id = %id, "Deleted product");

        if let Some(image) = image
            && self.is_uploaded_image(&image).await
        {
            self.release_image(&image).await;
        }
        Ok(())
    }

    async fn is_uploaded_image(&self, image: &str) -> bool {
        if image.is_empty() || image.contains("://") {
            return false;
        }
        self.images.exists(image).await.unwrap_or(false)
    }

    async fn release_image(&self, name: &str) {
        match self.images.delete(name).await {
            Ok(true) => debug!(name, "Released product image"),
            Ok(false) => {}
            Err(e) => warn!(name, error = %e, "Failed to release product image"),
        }
    }
}

fn created_at(listing: &Listing) -> Option<DateTime<Utc>> {
    listing
        .product
        .created_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

/// Newest `created_at` first, undated listings last, ties broken by id.
fn newest_first(a: &Listing, b: &Listing) -> Ordering {
    match (created_at(a), created_at(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.id.cmp(&b.id))
}
