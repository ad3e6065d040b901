//! PostgreSQL-backed `DocumentStore` implementation
//!
//! Every document lives in a single `documents` table keyed by
//! `(collection path, document id)`. Sub-collections are simply longer
//! collection paths, so a parent row and its children are independent rows.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::{
    db::{
        path::{CollectionPath, DocumentPath},
        traits::{Document, DocumentStore, Fields, OrderBy},
    },
    Result,
};

/// PostgreSQL-backed DocumentStore implementation
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pub(crate) pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_document(collection: &CollectionPath, row: &PgRow) -> Result<Document> {
        let id: String = row.get("id");
        let data: JsonValue = row.get("data");
        Ok(Document {
            path: collection.doc(id)?,
            data: into_fields(data),
        })
    }
}

fn into_fields(value: JsonValue) -> Fields {
    match value {
        JsonValue::Object(map) => map,
        _ => Fields::new(),
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        let collection = path.parent();
        let row = sqlx::query("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_string())
            .bind(path.id())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| Self::row_to_document(&collection, &r))
            .transpose()
    }

    async fn set(&self, path: &DocumentPath, data: Fields) -> Result<()> {
        sqlx::query(
            "INSERT INTO documents (collection, id, data)
             VALUES ($1, $2, $3)
             ON CONFLICT (collection, id)
             DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()",
        )
        .bind(path.parent().as_string())
        .bind(path.id())
        .bind(JsonValue::Object(data))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn add(&self, collection: &CollectionPath, data: Fields) -> Result<DocumentPath> {
        let path = collection.doc(Uuid::new_v4().simple().to_string())?;
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection.as_string())
            .bind(path.id())
            .bind(JsonValue::Object(data))
            .execute(&self.pool)
            .await?;
        Ok(path)
    }

    async fn delete(&self, path: &DocumentPath) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(path.parent().as_string())
            .bind(path.id())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(
        &self,
        collection: &CollectionPath,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>> {
        let rows = match order_by {
            Some(order) => {
                sqlx::query(
                    "SELECT id, data FROM documents
                     WHERE collection = $1
                     ORDER BY data -> $2 DESC NULLS LAST, id ASC",
                )
                .bind(collection.as_string())
                .bind(&order.field)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query("SELECT id, data FROM documents WHERE collection = $1 ORDER BY id")
                    .bind(collection.as_string())
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter()
            .map(|r| Self::row_to_document(collection, r))
            .collect()
    }

    async fn batch_delete(&self, paths: &[DocumentPath]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let (collections, ids): (Vec<String>, Vec<String>) = paths
            .iter()
            .map(|p| (p.parent().as_string(), p.id().to_string()))
            .unzip();

        // A single statement commits atomically.
        sqlx::query(
            "DELETE FROM documents d
             USING UNNEST($1::text[], $2::text[]) AS t(collection, id)
             WHERE d.collection = t.collection AND d.id = t.id",
        )
        .bind(&collections)
        .bind(&ids)
        .execute(&self.pool)
        .await?;

        tracing::debug!(count = paths.len(), "Batch delete committed");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
