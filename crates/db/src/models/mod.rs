//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO whose fields distinguish absent from `null`
//! - A `Deserialize` listing query that resolves into a core listing

pub mod dashboard;
pub mod rating;
pub mod script;
