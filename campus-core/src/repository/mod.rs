//! Data access layer (Repository pattern)

pub mod college;
pub mod stall;

pub use college::{CollegeRepository, CollegeRepositoryImpl};
pub use stall::{StallRepository, StallRepositoryImpl};
