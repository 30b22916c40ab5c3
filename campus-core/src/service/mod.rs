//! Business logic layer

pub mod college;
pub mod stall;

pub use college::CollegeService;
pub use stall::StallService;
