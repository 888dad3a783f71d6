use axum::Json;

use crate::models::shared::MessageResponse;

#[utoipa::path(
    get,
    path = "/",
    tag = "Meta",
    operation_id = "root",
    summary = "Liveness greeting",
    responses((status = 200, description = "Service is up", body = MessageResponse)),
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello World"))
}
