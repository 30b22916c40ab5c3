//! Domain models for Campus Core

pub mod college;
pub mod stall;

pub use college::*;
pub use stall::*;
