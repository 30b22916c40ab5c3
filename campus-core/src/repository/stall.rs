//! Stall repository

use crate::domain::Stall;
use crate::store::{
    from_fields, to_fields, CreateOutcome, Document, DocumentStore, FieldUpdate, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const STALLS: &str = "stalls";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StallRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Stall>>;
    async fn list(&self) -> Result<Vec<Stall>>;
    async fn create(&self, stall: &Stall) -> Result<CreateOutcome>;
    async fn update_profile(
        &self,
        id: &str,
        name: &str,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<()>;
    async fn set_verified(&self, id: &str, verified: bool, at: DateTime<Utc>) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StallBody {
    name: String,
    email: String,
    #[serde(default)]
    is_verified: bool,
    #[serde(default)]
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StallBody {
    fn from_document(document: Document) -> Result<Stall> {
        let body: StallBody = from_fields(document.fields)?;
        Ok(Stall {
            id: document.id,
            name: body.name,
            email: body.email,
            is_verified: body.is_verified,
            created_by: body.created_by,
            created_at: body.created_at,
            updated_at: body.updated_at,
        })
    }
}

impl From<&Stall> for StallBody {
    fn from(stall: &Stall) -> Self {
        Self {
            name: stall.name.clone(),
            email: stall.email.clone(),
            is_verified: stall.is_verified,
            created_by: stall.created_by.clone(),
            created_at: stall.created_at,
            updated_at: stall.updated_at,
        }
    }
}

pub struct StallRepositoryImpl<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> StallRepositoryImpl<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

fn set(field: &str, value: Value) -> (String, FieldUpdate) {
    (field.to_string(), FieldUpdate::Set(value))
}

#[async_trait]
impl<S: DocumentStore> StallRepository for StallRepositoryImpl<S> {
    async fn find_by_id(&self, id: &str) -> Result<Option<Stall>> {
        self.store
            .get(STALLS, id)
            .await?
            .map(StallBody::from_document)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Stall>> {
        self.store
            .list(STALLS)
            .await?
            .into_iter()
            .map(StallBody::from_document)
            .collect()
    }

    async fn create(&self, stall: &Stall) -> Result<CreateOutcome> {
        let fields = to_fields(&StallBody::from(stall))?;
        self.store.create_if_absent(STALLS, &stall.id, fields).await
    }

    async fn update_profile(
        &self,
        id: &str,
        name: &str,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let updates = vec![
            set("name", Value::String(name.to_string())),
            set("email", Value::String(email.to_string())),
            set("updatedAt", serde_json::to_value(at)?),
        ];
        self.store.update_fields(STALLS, id, updates).await
    }

    async fn set_verified(&self, id: &str, verified: bool, at: DateTime<Utc>) -> Result<()> {
        let updates = vec![
            set("isVerified", Value::Bool(verified)),
            set("updatedAt", serde_json::to_value(at)?),
        ];
        self.store.update_fields(STALLS, id, updates).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.store.delete(STALLS, id).await
    }
}
