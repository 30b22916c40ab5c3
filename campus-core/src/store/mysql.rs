//! MySQL-backed document store
//!
//! Documents are rows of a single `documents` table keyed by
//! `(collection, id)`. Field updates lock the row with `SELECT ... FOR UPDATE`
//! inside a transaction, merge in memory and write back before commit, so
//! concurrent writers to one document are serialized by InnoDB.

use super::{
    apply_updates, CreateOutcome, Document, DocumentStore, FieldUpdates, Fields, Result,
    StoreError,
};
use crate::config::DatabaseConfig;
use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use std::time::Duration;
use tracing::debug;

pub struct MySqlDocumentStore {
    pool: MySqlPool,
}

impl MySqlDocumentStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Connect a pool using the database configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        Ok(Self::new(pool))
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn decode_body(body: &str) -> Result<Fields> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl DocumentStore for MySqlDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT body FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(body,)| {
            Ok(Document {
                id: id.to_string(),
                fields: decode_body(&body)?,
            })
        })
        .transpose()
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, body)| {
                Ok(Document {
                    id,
                    fields: decode_body(&body)?,
                })
            })
            .collect()
    }

    async fn create_if_absent(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<CreateOutcome> {
        let body = serde_json::to_string(&fields)?;

        let result = sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body, created_at, updated_at)
            VALUES (?, ?, ?, NOW(6), NOW(6))
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(&body)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(CreateOutcome::Created),
            // The primary key makes the insert the arbiter between racing creators
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        updates: FieldUpdates,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        // Row lock held until commit; a concurrent writer waits here
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT body FROM documents WHERE collection = ? AND id = ? FOR UPDATE",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let (body,) = row.ok_or_else(|| StoreError::not_found(collection, id))?;
        let mut fields = decode_body(&body)?;
        apply_updates(&mut fields, &updates);
        let body = serde_json::to_string(&fields)?;

        sqlx::query(
            r#"
            UPDATE documents
            SET body = ?, updated_at = NOW(6)
            WHERE collection = ? AND id = ?
            "#,
        )
        .bind(&body)
        .bind(collection)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(collection, id, fields = updates.len(), "Document fields updated");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_body() {
        let fields = decode_body(r#"{"name":"Tint","domains":["tint.edu.in"]}"#).unwrap();
        assert_eq!(fields["name"], "Tint");
    }

    #[test]
    fn test_decode_body_rejects_non_object() {
        assert!(matches!(
            decode_body("[1,2,3]"),
            Err(StoreError::Serialization(_))
        ));
    }
}
