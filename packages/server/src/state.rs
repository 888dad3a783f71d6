use sea_orm::DatabaseConnection;

use crate::catalog::Catalog;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub catalog: Catalog,
}
