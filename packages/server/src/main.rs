use std::sync::Arc;

use anyhow::Context;
use common::storage::filesystem::FilesystemImageStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use marketplace::catalog::Catalog;
use marketplace::config::AppConfig;
use marketplace::database::init_db;
use marketplace::seed::seed_sample_products;
use marketplace::state::AppState;
use marketplace::store::DbRecordStore;
use marketplace::upgrade::upgrade_all;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    info!("Database ready");

    let images = FilesystemImageStore::new(
        config.storage.uploads_dir.clone(),
        config.storage.max_image_size,
    )
    .await
    .with_context(|| {
        format!(
            "Failed to open uploads directory {}",
            config.storage.uploads_dir.display()
        )
    })?;

    let records = Arc::new(DbRecordStore::new(db.clone()));
    let catalog = Catalog::new(records, Arc::new(images));

    if config.catalog.seed_samples {
        seed_sample_products(catalog.records())
            .await
            .context("Failed to seed sample products")?;
    }

    if config.catalog.upgrade_on_startup {
        upgrade_all(catalog.records())
            .await
            .context("Failed to upgrade legacy products")?;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config,
        catalog,
    };
    let app = marketplace::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
