use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::DatabaseConfig;

pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.clone());

    // Set connection pool options
    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(config.log_statements);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("marketplace::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Fresh in-memory database with the schema applied.
///
/// Pinned to one connection: every sqlite in-memory connection is its own database.
#[cfg(test)]
pub(crate) async fn memory_db() -> DatabaseConnection {
    init_db(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        log_statements: false,
    })
    .await
    .expect("in-memory database should initialize")
}
