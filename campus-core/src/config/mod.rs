//! Configuration management for Campus Core

use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,
    /// The college this deployment administers
    pub college: CollegeConfig,
    /// Identifier recorded as `createdBy` on stalls created by this process
    pub admin_id: String,
    /// Logging configuration
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct CollegeConfig {
    pub id: String,
    /// Used only when the college record does not exist yet
    pub name: String,
    /// Used only when the college record does not exist yet
    pub initial_domains: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "text" or "json"
    pub log_format: String,
    pub service_name: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            service_name: "campus-core".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS", 1)?,
                acquire_timeout_secs: parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
            },
            college: CollegeConfig {
                id: env::var("COLLEGE_ID").context("COLLEGE_ID is required")?,
                name: env::var("COLLEGE_NAME").unwrap_or_else(|_| "College".to_string()),
                initial_domains: env::var("COLLEGE_DOMAINS")
                    .map(|value| parse_list(&value))
                    .unwrap_or_default(),
            },
            admin_id: env::var("ADMIN_ID").unwrap_or_else(|_| "admin".to_string()),
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "campus-core".to_string()),
            },
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}", name)),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated list, dropping empty entries
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list("tint.edu.in, example.edu,,"),
            vec!["tint.edu.in".to_string(), "example.edu".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_parse_var_default_when_unset() {
        let value: u32 = parse_var("CAMPUS_CORE_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_var_invalid() {
        env::set_var("CAMPUS_CORE_TEST_BAD_NUMBER", "many");
        let result: Result<u32> = parse_var("CAMPUS_CORE_TEST_BAD_NUMBER", 7);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("CAMPUS_CORE_TEST_BAD_NUMBER"));
    }

    #[test]
    fn test_telemetry_default() {
        let telemetry = TelemetryConfig::default();
        assert_eq!(telemetry.log_format, "text");
    }
}
