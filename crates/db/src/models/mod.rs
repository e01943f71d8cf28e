//! Entity model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - A filter struct for list queries where the resource supports them

pub mod employee;
pub mod expense;
pub mod harvest;
pub mod season;
pub mod user;
pub mod workday;
