//! College registry business logic
//!
//! Owns the tenant record and its email domain whitelist. Every call reads or
//! writes through to the repository; nothing is cached here.

use crate::domain::{email_domain, is_valid_domain, College, CollegeDomains};
use crate::error::{AppError, Result};
use crate::repository::CollegeRepository;
use crate::store::{CreateOutcome, StoreError};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const MSG_LOAD_DOMAINS: &str = "Failed to load domains. Please try again.";
const MSG_LOAD_COLLEGES: &str = "Failed to load colleges. Please try again.";

pub struct CollegeService<R: CollegeRepository> {
    repo: Arc<R>,
}

impl<R: CollegeRepository> CollegeService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Return the college, creating it on first use.
    ///
    /// `name` and `domains` only take effect when no record exists for
    /// `college_id`; an existing record is returned unchanged and the
    /// initial domains are not checked against it.
    pub async fn get_or_create(
        &self,
        college_id: &str,
        name: &str,
        domains: &[String],
    ) -> Result<College> {
        if college_id.trim().is_empty() {
            return Err(AppError::Validation("College id is required".to_string()));
        }
        if name.trim().is_empty() {
            return Err(AppError::Validation("College name is required".to_string()));
        }
        if let Some(existing) = self
            .repo
            .find_by_id(college_id)
            .await
            .map_err(|e| unavailable(college_id, e))?
        {
            debug!(college_id, "College already exists");
            return Ok(existing);
        }

        let college = College::new(college_id, name, initial_domains(domains)?);
        let outcome = self
            .repo
            .create_if_absent(&college)
            .await
            .map_err(|e| unavailable(college_id, e))?;

        match outcome {
            CreateOutcome::Created => {
                info!(college_id, name, "College created");
                Ok(college)
            }
            CreateOutcome::AlreadyExists => {
                debug!(college_id, "College created by a concurrent caller, reading it back");
                self.repo
                    .find_by_id(college_id)
                    .await
                    .map_err(|e| unavailable(college_id, e))?
                    .ok_or_else(|| {
                        AppError::Internal(anyhow::anyhow!(
                            "College {} missing after conflicting create",
                            college_id
                        ))
                    })
            }
        }
    }

    /// All colleges, oldest first
    pub async fn list(&self) -> Result<Vec<College>> {
        let mut colleges = self.repo.list().await.map_err(|e| {
            error!(error = ?e, "Failed to list colleges");
            AppError::LoadFailed {
                message: MSG_LOAD_COLLEGES,
                source: e,
            }
        })?;

        colleges.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(colleges)
    }

    pub async fn get_domains(&self, college_id: &str) -> Result<CollegeDomains> {
        match self.repo.find_by_id(college_id).await {
            Ok(Some(college)) => {
                debug!(college_id, count = college.domains.len(), "Domains fetched");
                Ok(college.into())
            }
            Ok(None) => Err(AppError::NotFound(format!("College {} not found", college_id))),
            Err(e) => {
                error!(college_id, error = ?e, "Failed to fetch domains");
                Err(AppError::LoadFailed {
                    message: MSG_LOAD_DOMAINS,
                    source: e,
                })
            }
        }
    }

    pub async fn add_domain(&self, college_id: &str, domain: &str) -> Result<()> {
        if !is_valid_domain(domain) {
            return Err(AppError::InvalidFormat(domain.to_string()));
        }

        let college = self
            .repo
            .find_by_id(college_id)
            .await
            .map_err(|e| unavailable(college_id, e))?
            .ok_or_else(|| AppError::NotFound(format!("College {} not found", college_id)))?;

        if college.has_domain(domain) {
            return Err(AppError::DuplicateDomain(domain.to_string()));
        }

        // Set union in the store: a racing add of the same domain collapses
        // into one entry, racing adds of different domains are all kept.
        self.repo
            .add_domain(college_id, domain, Utc::now())
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    AppError::NotFound(format!("College {} not found", college_id))
                } else {
                    unavailable(college_id, e)
                }
            })?;

        info!(college_id, domain, "Domain added");
        Ok(())
    }

    /// Remove a domain; removing one that is not listed is not an error
    pub async fn remove_domain(&self, college_id: &str, domain: &str) -> Result<()> {
        self.repo
            .remove_domain(college_id, domain, Utc::now())
            .await
            .map_err(|e| {
                error!(college_id, domain, error = ?e, "Failed to remove domain");
                AppError::RemoveFailed(e)
            })?;

        info!(college_id, domain, "Domain removed");
        Ok(())
    }

    /// Whether the email's domain is whitelisted for the college.
    ///
    /// Fails closed: any error while loading the whitelist yields `false`.
    pub async fn is_domain_allowed(&self, college_id: &str, email: &str) -> bool {
        let domain = email_domain(email);

        match self.get_domains(college_id).await {
            Ok(whitelist) => whitelist.domains.iter().any(|d| d == domain),
            Err(e) => {
                warn!(college_id, domain, error = %e, "Denying email domain, whitelist unavailable");
                false
            }
        }
    }
}

/// Validate initial domains and drop repeats, keeping first occurrences
fn initial_domains(domains: &[String]) -> Result<Vec<String>> {
    let mut unique: Vec<String> = Vec::with_capacity(domains.len());
    for domain in domains {
        if !is_valid_domain(domain) {
            return Err(AppError::InvalidFormat(domain.clone()));
        }
        if !unique.contains(domain) {
            unique.push(domain.clone());
        }
    }
    Ok(unique)
}

fn unavailable(college_id: &str, err: StoreError) -> AppError {
    error!(college_id, error = ?err, "College storage operation failed");
    AppError::StorageUnavailable(err)
}
