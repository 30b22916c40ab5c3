//! College repository

use crate::domain::College;
use crate::store::{
    from_fields, to_fields, CreateOutcome, Document, DocumentStore, FieldUpdate, FieldUpdates,
    Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const COLLEGES: &str = "colleges";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollegeRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<College>>;
    async fn list(&self) -> Result<Vec<College>>;
    /// Persist `college` unless a record with its ID already exists
    async fn create_if_absent(&self, college: &College) -> Result<CreateOutcome>;
    async fn add_domain(&self, id: &str, domain: &str, at: DateTime<Utc>) -> Result<()>;
    async fn remove_domain(&self, id: &str, domain: &str, at: DateTime<Utc>) -> Result<()>;
}

/// Stored body of a college document; the ID is the document key
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollegeBody {
    name: String,
    #[serde(default)]
    domains: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CollegeBody {
    fn from_document(document: Document) -> Result<College> {
        let body: CollegeBody = from_fields(document.fields)?;
        Ok(College {
            id: document.id,
            name: body.name,
            domains: body.domains,
            created_at: body.created_at,
            updated_at: body.updated_at,
        })
    }
}

impl From<&College> for CollegeBody {
    fn from(college: &College) -> Self {
        Self {
            name: college.name.clone(),
            domains: college.domains.clone(),
            created_at: college.created_at,
            updated_at: college.updated_at,
        }
    }
}

pub struct CollegeRepositoryImpl<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> CollegeRepositoryImpl<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

/// Domain set change plus `updatedAt` refresh, applied together
fn domain_update(update: FieldUpdate, at: DateTime<Utc>) -> Result<FieldUpdates> {
    Ok(vec![
        ("domains".to_string(), update),
        ("updatedAt".to_string(), FieldUpdate::Set(serde_json::to_value(at)?)),
    ])
}

#[async_trait]
impl<S: DocumentStore> CollegeRepository for CollegeRepositoryImpl<S> {
    async fn find_by_id(&self, id: &str) -> Result<Option<College>> {
        self.store
            .get(COLLEGES, id)
            .await?
            .map(CollegeBody::from_document)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<College>> {
        self.store
            .list(COLLEGES)
            .await?
            .into_iter()
            .map(CollegeBody::from_document)
            .collect()
    }

    async fn create_if_absent(&self, college: &College) -> Result<CreateOutcome> {
        let fields = to_fields(&CollegeBody::from(college))?;
        self.store
            .create_if_absent(COLLEGES, &college.id, fields)
            .await
    }

    async fn add_domain(&self, id: &str, domain: &str, at: DateTime<Utc>) -> Result<()> {
        let updates = domain_update(
            FieldUpdate::ArrayUnion(vec![Value::String(domain.to_string())]),
            at,
        )?;
        self.store.update_fields(COLLEGES, id, updates).await
    }

    async fn remove_domain(&self, id: &str, domain: &str, at: DateTime<Utc>) -> Result<()> {
        let updates = domain_update(
            FieldUpdate::ArrayRemove(vec![Value::String(domain.to_string())]),
            at,
        )?;
        self.store.update_fields(COLLEGES, id, updates).await
    }
}
