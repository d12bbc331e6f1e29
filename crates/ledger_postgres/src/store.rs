//! Postgres implementation of the `RecordStore` port.
//!
//! All collections share one table; each document body is a JSONB column.
//! Filters are pushed down as JSONB field predicates. SQL is runtime-checked
//! (sqlx::query, not sqlx::query!) to avoid a compile-time DB requirement.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use ledger_core::models::{Collection, RecordId};
use ledger_core::ports::{Document, Filter, JsonObject, RecordStore};

const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS ledger_records (
        id          UUID PRIMARY KEY,
        seq         BIGSERIAL NOT NULL,
        collection  TEXT NOT NULL,
        body        JSONB NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS ledger_records_collection_created_idx
        ON ledger_records (collection, created_at DESC, seq DESC)
    "#,
];

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: Uuid,
    body: Json<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RecordRow> for Document {
    type Error = anyhow::Error;

    fn try_from(row: RecordRow) -> Result<Self> {
        match row.body.0 {
            serde_json::Value::Object(body) => Ok(Document {
                id: RecordId(row.id),
                created_at: row.created_at,
                body,
            }),
            other => Err(anyhow!("record {} has non-object body: {other}", row.id)),
        }
    }
}

/// Postgres-backed record store. Cheap to clone; wraps a `PgPool`.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a pool and make sure the records table exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("failed to connect to database")?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        for stmt in SCHEMA_STATEMENTS {
            sqlx::query(stmt)
                .execute(&self.pool)
                .await
                .context("failed to create ledger_records table")?;
        }
        tracing::debug!("ledger_records schema ready");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert(&self, collection: Collection, body: JsonObject) -> Result<Document> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            INSERT INTO ledger_records (id, collection, body)
            VALUES ($1, $2, $3)
            RETURNING id, body, created_at
            "#,
        )
        .bind(RecordId::new().0)
        .bind(collection.as_str())
        .bind(Json(serde_json::Value::Object(body)))
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>> {
        let predicate = match filter {
            Filter::All => "",
            Filter::Equals { .. } => "AND body->>$2 = $3",
            // strpos avoids LIKE wildcard escaping of the needle.
            Filter::Contains { .. } => "AND strpos(lower(body->>$2), lower($3)) > 0",
        };
        let sql = format!(
            r#"
            SELECT id, body, created_at
            FROM ledger_records
            WHERE collection = $1 {predicate}
            ORDER BY created_at DESC, seq DESC
            "#
        );
        let mut query = sqlx::query_as::<_, RecordRow>(&sql).bind(collection.as_str());
        match filter {
            Filter::All => {}
            Filter::Equals { field, value } => query = query.bind(*field).bind(value.as_str()),
            Filter::Contains { field, needle } => query = query.bind(*field).bind(needle.as_str()),
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Document::try_from).collect()
    }

    async fn find_by_id(&self, collection: Collection, id: RecordId) -> Result<Option<Document>> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT id, body, created_at
            FROM ledger_records
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection.as_str())
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Document::try_from).transpose()
    }

    async fn replace(
        &self,
        collection: Collection,
        id: RecordId,
        body: JsonObject,
    ) -> Result<Option<Document>> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            UPDATE ledger_records
            SET body = $3
            WHERE collection = $1 AND id = $2
            RETURNING id, body, created_at
            "#,
        )
        .bind(collection.as_str())
        .bind(id.0)
        .bind(Json(serde_json::Value::Object(body)))
        .fetch_optional(&self.pool)
        .await?;
        row.map(Document::try_from).transpose()
    }

    async fn delete(&self, collection: Collection, id: RecordId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM ledger_records WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }
}
