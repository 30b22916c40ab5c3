//! Stall business logic

use crate::domain::{CreateStallInput, Stall, UpdateStallInput};
use crate::error::{AppError, Result};
use crate::repository::StallRepository;
use crate::store::{CreateOutcome, StoreError};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};
use validator::Validate;

const MSG_LOAD_STALLS: &str = "Failed to load stalls";

pub struct StallService<R: StallRepository> {
    repo: Arc<R>,
}

impl<R: StallRepository> StallService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// All stalls, newest first
    pub async fn list(&self) -> Result<Vec<Stall>> {
        let mut stalls = self.repo.list().await.map_err(|e| {
            error!(error = ?e, "Failed to list stalls");
            AppError::LoadFailed {
                message: MSG_LOAD_STALLS,
                source: e,
            }
        })?;

        stalls.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(stalls)
    }

    pub async fn get(&self, id: &str) -> Result<Stall> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| stall_error(id, e))?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, input: CreateStallInput, created_by: &str) -> Result<Stall> {
        input.validate()?;

        let stall = Stall::new(input, created_by);
        let outcome = self
            .repo
            .create(&stall)
            .await
            .map_err(|e| stall_error(&stall.id, e))?;

        match outcome {
            CreateOutcome::Created => {
                info!(stall_id = %stall.id, created_by, "Stall created");
                Ok(stall)
            }
            CreateOutcome::AlreadyExists => Err(AppError::Internal(anyhow::anyhow!(
                "Generated stall id {} already in use",
                stall.id
            ))),
        }
    }

    pub async fn update(&self, id: &str, input: UpdateStallInput) -> Result<Stall> {
        input.validate()?;

        self.repo
            .update_profile(id, &input.name, &input.email, Utc::now())
            .await
            .map_err(|e| stall_error(id, e))?;

        info!(stall_id = id, "Stall updated");
        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let deleted = self.repo.delete(id).await.map_err(|e| stall_error(id, e))?;
        if !deleted {
            return Err(not_found(id));
        }

        info!(stall_id = id, "Stall deleted");
        Ok(())
    }

    /// Flip verification relative to the state the caller last saw
    pub async fn toggle_verification(&self, id: &str, currently_verified: bool) -> Result<Stall> {
        let verified = !currently_verified;
        self.repo
            .set_verified(id, verified, Utc::now())
            .await
            .map_err(|e| stall_error(id, e))?;

        info!(stall_id = id, verified, "Stall verification changed");
        self.get(id).await
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Stall {} not found", id))
}

fn stall_error(id: &str, err: StoreError) -> AppError {
    if err.is_not_found() {
        return not_found(id);
    }
    error!(stall_id = id, error = ?err, "Stall storage operation failed");
    AppError::StorageUnavailable(err)
}
