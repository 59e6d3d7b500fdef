//! Domain types and pure logic for the script scoring backend.
//!
//! This crate has no I/O. It defines the shared error type, the pagination
//! and sorting rules, the resolved filter sets that the repository layer
//! turns into SQL, and the scoring rules applied when ratings are recorded.

pub mod dashboard;
pub mod dates;
pub mod error;
pub mod pagination;
pub mod rating_filter;
pub mod scoring;
pub mod script_filter;
pub mod serde_ext;
pub mod sorting;
pub mod types;
