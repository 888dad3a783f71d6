//! Persistence of product listings as `(id, json text)` rows.
//!
//! The store never looks inside the JSON text; shaping it is the job of
//! [`common::product`]. Every call borrows a pooled connection for its own
//! duration and touches exactly one row, except [`RecordStore::list_all`].

use async_trait::async_trait;
use common::MalformedRecord;
use sea_orm::prelude::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr};
use thiserror::Error;

use crate::entity::product;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record '{0}' not found")]
    NotFound(String),

    #[error("record '{0}' already exists")]
    DuplicateKey(String),

    #[error("record '{id}' is malformed: {source}")]
    MalformedRecord {
        id: String,
        #[source]
        source: MalformedRecord,
    },

    #[error("storage backend error: {0}")]
    Backend(#[from] DbErr),
}

impl StoreError {
    pub fn malformed(id: &str, source: MalformedRecord) -> Self {
        Self::MalformedRecord {
            id: id.to_string(),
            source,
        }
    }
}

/// Durable mapping from listing id to stored JSON text.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new row. Fails with [`StoreError::DuplicateKey`] if `id` is taken.
    async fn put(&self, id: &str, blob: &str) -> Result<(), StoreError>;

    /// Fetch the stored text for `id`.
    async fn get(&self, id: &str) -> Result<String, StoreError>;

    /// Every `(id, blob)` pair, in no particular order.
    async fn list_all(&self) -> Result<Vec<(String, String)>, StoreError>;

    /// Overwrite the text of an existing row in a single statement.
    async fn replace(&self, id: &str, blob: &str) -> Result<(), StoreError>;

    /// Remove a row. Fails with [`StoreError::NotFound`] if it does not exist.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// [`RecordStore`] over the `products` table.
#[derive(Clone)]
pub struct DbRecordStore {
    db: DatabaseConnection,
}

impl DbRecordStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn exists(&self, id: &str) -> Result<bool, DbErr> {
        Ok(product::Entity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?
            .is_some())
    }
}

#[async_trait]
impl RecordStore for DbRecordStore {
    async fn put(&self, id: &str, blob: &str) -> Result<(), StoreError> {
        let row = product::ActiveModel {
            id: Set(id.to_owned()),
            data: Set(blob.to_owned()),
        };

        let Err(e) = product::Entity::insert(row)
            .exec_without_returning(&self.db)
            .await
        else {
            return Ok(());
        };

        if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
            return Err(StoreError::DuplicateKey(id.to_string()));
        }

        // Not every driver reports primary-key clashes as unique violations.
        if self.exists(id).await.unwrap_or(false) {
            tracing::debug!(id, error = %e, "Insert failed on an existing key");
            return Err(StoreError::DuplicateKey(id.to_string()));
        }

        Err(e.into())
    }

    async fn get(&self, id: &str) -> Result<String, StoreError> {
        product::Entity::find_by_id(id.to_owned())
            .one(&self.db)
            .await?
            .map(|row| row.data)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<(String, String)>, StoreError> {
        let rows = product::Entity::find().all(&self.db).await?;
        Ok(rows.into_iter().map(|row| (row.id, row.data)).collect())
    }

    async fn replace(&self, id: &str, blob: &str) -> Result<(), StoreError> {
        let result = product::Entity::update_many()
            .col_expr(product::Column::Data, Expr::value(blob.to_owned()))
            .filter(product::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = product::Entity::delete_by_id(id.to_owned())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
