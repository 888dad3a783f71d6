use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A product listing stored as an opaque JSON document.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// JSON text exactly as written. Kept as text so damaged rows can still be loaded.
    #[sea_orm(column_type = "Text")]
    pub data: String,
}

impl ActiveModelBehavior for ActiveModel {}
