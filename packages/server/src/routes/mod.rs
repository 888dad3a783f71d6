use axum::extract::DefaultBodyLimit;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers::{auth, meta, product, profile, uploads};
use crate::state::AppState;

/// Multipart framing and text fields on top of the largest accepted image.
const FORM_OVERHEAD: u64 = 1024 * 1024;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let body_limit = usize::try_from(config.storage.max_image_size.saturating_add(FORM_OVERHEAD))
        .unwrap_or(usize::MAX);

    OpenApiRouter::new()
        .routes(routes!(meta::root))
        .merge(product_routes())
        .merge(auth_routes())
        .routes(routes!(profile::get_profile, profile::update_profile))
        .layer(DefaultBodyLimit::max(body_limit))
}

fn product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(product::list_products, product::create_product))
        .routes(routes!(product::get_product, product::delete_product))
        .routes(routes!(product::search_products))
        .routes(routes!(uploads::get_upload))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .routes(routes!(auth::logout))
        .routes(routes!(auth::protected))
}
