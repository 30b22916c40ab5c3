//! College (tenant) domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest domain name accepted, per DNS limits
const MAX_DOMAIN_LEN: usize = 253;

/// The tenant record owning the email domain whitelist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct College {
    pub id: String,
    pub name: String,
    /// Allowed email domains, compared case-sensitively
    pub domains: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl College {
    /// Build a fresh record with both timestamps set to now
    pub fn new(id: impl Into<String>, name: impl Into<String>, domains: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            domains,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }
}

/// Display name and whitelist of a college
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeDomains {
    pub college_name: String,
    pub domains: Vec<String>,
}

impl From<College> for CollegeDomains {
    fn from(college: College) -> Self {
        Self {
            college_name: college.name,
            domains: college.domains,
        }
    }
}

/// Check a domain against the whitelist syntax: dot-separated alphanumeric
/// labels (inner hyphens allowed) ending in an alphabetic TLD of 2+ letters.
///
/// Mixed case is accepted and stored as given; no lowercasing happens here
/// or on lookup, so `X1.EDU` and `x1.edu` are distinct whitelist entries.
pub fn is_valid_domain(domain: &str) -> bool {
    domain.len() <= MAX_DOMAIN_LEN && DOMAIN_REGEX.is_match(domain)
}

/// Domain part of an email address: everything after the last `@`,
/// or an empty string when there is no `@`.
pub fn email_domain(email: &str) -> &str {
    email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("")
}

lazy_static::lazy_static! {
    pub static ref DOMAIN_REGEX: regex::Regex = regex::Regex::new(
        r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}$"
    )
    .unwrap();
}
