use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::storage::image_extension;
use tracing::instrument;

use crate::catalog::ProductImage;
use crate::error::{AppError, ErrorBody};
use crate::models::product::{
    CreateProductResponse, ProductForm, ProductResponse, SearchQuery, validate_image_url,
};
use crate::models::shared::MessageResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    operation_id = "listProducts",
    summary = "List all products",
    description = "Returns every readable listing, newest first. Legacy listings are shown \
        with a derived `contact`; unreadable rows are skipped.",
    responses(
        (status = 200, description = "Product list", body = Vec<ProductResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let listings = state.catalog.list().await?;
    Ok(Json(listings.into_iter().map(ProductResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    operation_id = "createProduct",
    summary = "Create a product listing",
    description = "Multipart form with `title`, `price`, `description`, `category` and `contact` \
        text fields. `photo` is either an image file or an http(s) URL given as text.",
    request_body(content_type = "multipart/form-data", description = "Listing fields and photo"),
    responses(
        (status = 201, description = "Product created", body = CreateProductResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, multipart), fields(product_id))]
pub async fn create_product(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut form = ProductForm::default();
    let mut photo: Option<ProductImage> = None;
    let max_size = state.config.storage.max_image_size;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == "photo" {
            if let Some(image) = read_photo(field, max_size).await? {
                photo = Some(image);
            }
            continue;
        }
        let text = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))?;
        form.set(&name, text);
    }

    let new = form.validate()?;
    let photo = photo.ok_or_else(|| AppError::Validation("Missing 'photo' field".into()))?;

    let listing = state.catalog.create(new, photo).await?;
    tracing::Span::current().record("product_id", listing.id.as_str());

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            message: "Product created successfully".into(),
            product_id: listing.id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    operation_id = "getProduct",
    summary = "Get a product by ID",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Stored record unreadable (MALFORMED_RECORD)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let listing = state.catalog.get(&id).await?;
    Ok(Json(listing.into()))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    operation_id = "deleteProduct",
    summary = "Delete a product",
    description = "Removes the listing and, if it was uploaded here, its image.",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.catalog.delete(&id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/search",
    tag = "Products",
    operation_id = "searchProducts",
    summary = "Search products",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products, newest first", body = Vec<ProductResponse>),
    ),
)]
#[instrument(skip(state, params), fields(query = params.query.as_deref().unwrap_or_default()))]
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let listings = state.catalog.search(params.query.as_deref()).await?;
    Ok(Json(listings.into_iter().map(ProductResponse::from).collect()))
}

/// Read the `photo` field: a file part becomes an upload, a text part must be a URL.
///
/// An empty part (a blank URL, or a file input left empty, which browsers send
/// with `filename=""` and no content) counts as no photo.
async fn read_photo(
    mut field: Field<'_>,
    max_size: u64,
) -> Result<Option<ProductImage>, AppError> {
    let Some(filename) = field.file_name().map(str::to_string) else {
        let url = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read photo: {e}")))?;
        if url.trim().is_empty() {
            return Ok(None);
        }
        return Ok(Some(ProductImage::Url(validate_image_url(&url)?)));
    };

    let extension = image_extension(&filename);
    if extension.is_none() && !filename.is_empty() {
        return Err(AppError::Validation("Photo must be an image file".into()));
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        if (bytes.len() + chunk.len()) as u64 > max_size {
            return Err(AppError::Validation(format!(
                "Image exceeds maximum size of {max_size} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    match (extension, bytes.is_empty()) {
        (None, true) => Ok(None),
        (None, false) => Err(AppError::Validation("Photo must be an image file".into())),
        (Some(_), true) => Err(AppError::Validation("Photo file is empty".into())),
        (Some(extension), false) => Ok(Some(ProductImage::Upload { extension, bytes })),
    }
}
