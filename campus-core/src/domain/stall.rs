//! Stall (vendor account) domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const MSG_FILL_ALL_FIELDS: &str = "Please fill in all fields";
pub const MSG_INVALID_EMAIL: &str = "Please enter a valid email address";

/// Stall entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stall {
    pub id: String,
    pub name: String,
    /// Login email of the stall owner
    pub email: String,
    pub is_verified: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Stall {
    /// Build an unverified stall with a fresh ID
    pub fn new(input: CreateStallInput, created_by: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            email: input.email,
            is_verified: false,
            created_by: created_by.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a new stall
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStallInput {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_stall_email"))]
    pub email: String,
}

/// Input for updating a stall's profile
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStallInput {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_stall_email"))]
    pub email: String,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(MSG_FILL_ALL_FIELDS.into()));
    }
    Ok(())
}

fn validate_stall_email(email: &str) -> Result<(), ValidationError> {
    validate_not_blank(email)?;
    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_email").with_message(MSG_INVALID_EMAIL.into()))
    }
}

lazy_static::lazy_static! {
    pub static ref EMAIL_REGEX: regex::Regex =
        regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}
