use super::rows::{CacheMetadataRow, CachedRecordRow};
use crate::application::ports::cache_store::CacheStore;
use crate::domain::entities::offline::CacheStatusSnapshot;
use crate::domain::value_objects::{Collection, RecordId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::{Pool, Sqlite};

pub struct SqliteCacheStore {
    pool: Pool<Sqlite>,
}

impl SqliteCacheStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CacheStore for SqliteCacheStore {
    async fn refresh_all(
        &self,
        collection: &Collection,
        records: Vec<Value>,
    ) -> Result<(), AppError> {
        let refreshed_at = Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        // Replace, not merge: rows absent from the new snapshot (including
        // placeholder rows from offline creates) are superseded.
        sqlx::query("DELETE FROM cached_records WHERE collection = ?1")
            .bind(collection.as_str())
            .execute(&mut *tx)
            .await?;

        let record_count = records.len() as i64;
        for record in &records {
            let record_id = RecordId::from_document(record).map_err(AppError::Validation)?;
            sqlx::query(
                r#"
                INSERT INTO cached_records (collection, record_id, data, refreshed_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(collection, record_id) DO UPDATE SET
                    data = excluded.data,
                    refreshed_at = excluded.refreshed_at
                "#,
            )
            .bind(collection.as_str())
            .bind(record_id.storage_key())
            .bind(serde_json::to_string(record)?)
            .bind(refreshed_at)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO cache_metadata (collection, last_refreshed_at, record_count)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(collection) DO UPDATE SET
                last_refreshed_at = excluded.last_refreshed_at,
                record_count = excluded.record_count
            "#,
        )
        .bind(collection.as_str())
        .bind(refreshed_at)
        .bind(record_count)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn read_all(&self, collection: &Collection) -> Result<Vec<Value>, AppError> {
        let rows = sqlx::query_as::<_, CachedRecordRow>(
            "SELECT data FROM cached_records WHERE collection = ?1",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CachedRecordRow::into_document).collect()
    }

    async fn status(&self) -> Result<CacheStatusSnapshot, AppError> {
        let rows = sqlx::query_as::<_, CacheMetadataRow>(
            r#"
            SELECT collection, last_refreshed_at, record_count
            FROM cache_metadata
            ORDER BY collection
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let collections = rows
            .into_iter()
            .map(CacheMetadataRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CacheStatusSnapshot { collections })
    }
}
