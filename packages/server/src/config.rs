use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Log every SQL statement at INFO.
    #[serde(default)]
    pub log_statements: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued access tokens.
    pub token_ttl_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding uploaded product images.
    pub uploads_dir: PathBuf,
    /// Maximum size of one uploaded image, in bytes.
    pub max_image_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Insert sample listings when the products table is empty.
    pub seed_samples: bool,
    /// Rewrite legacy listings into canonical shape before serving.
    pub upgrade_on_startup: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("server.cors.allow_origins", vec!["http://localhost:5173"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://marketplace.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.token_ttl_minutes", 30)?
            .set_default("storage.uploads_dir", "./uploads")?
            .set_default("storage.max_image_size", 10 * 1024 * 1024)?
            .set_default("catalog.seed_samples", true)?
            .set_default("catalog.upgrade_on_startup", true)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., MARKETPLACE__AUTH__JWT_SECRET)
            .add_source(
                Environment::with_prefix("MARKETPLACE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
