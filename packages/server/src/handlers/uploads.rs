use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use common::storage::ImageStore;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/uploads/{filename}",
    tag = "Products",
    operation_id = "getUpload",
    summary = "Download an uploaded product image",
    params(("filename" = String, Path, description = "Image filename as stored on the product")),
    responses(
        (status = 200, description = "Image bytes with a content type guessed from the extension"),
        (status = 400, description = "Invalid filename (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let images = state.catalog.images();
    let size = images.size(&filename).await?;
    let reader = images.get_stream(&filename).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = mime_guess::from_path(&filename).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .header(header::CONTENT_SECURITY_POLICY, "sandbox")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
