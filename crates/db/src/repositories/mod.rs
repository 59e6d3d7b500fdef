//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

mod listing;

pub mod dashboard_repo;
pub mod rating_repo;
pub mod script_repo;

pub use dashboard_repo::DashboardRepo;
pub use rating_repo::{RatingRepo, RatingWrite};
pub use script_repo::ScriptRepo;
