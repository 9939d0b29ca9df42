use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::{validate_key, RecordStore, StoreError};

/// Postgres-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        validate_key(collection)?;
        validate_key(id)?;
        let data: Option<Value> =
            sqlx::query_scalar("SELECT data FROM records WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(data)
    }

    async fn upsert(&self, collection: &str, id: &str, record: &Value) -> Result<(), StoreError> {
        validate_key(collection)?;
        validate_key(id)?;
        sqlx::query(
            r#"
            INSERT INTO records (collection, id, data, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(record)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn append(&self, log: &str, record: &Value) -> Result<(), StoreError> {
        validate_key(log)?;
        sqlx::query("INSERT INTO record_log (log, data) VALUES ($1, $2)")
            .bind(log)
            .bind(record)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
