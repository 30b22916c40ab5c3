//! Campus Core - college registry and stall management backend
//!
//! This crate provides the college tenant registry (email domain whitelist)
//! and stall management behind the campus console, on top of an abstract
//! document store.

pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod service;
pub mod store;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
