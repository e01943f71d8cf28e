//! Domain logic for the farmlog record-keeping API.
//!
//! Everything in this crate is pure: date-range admission rules, field-range
//! validation mirrored from the write DTOs, and the report aggregations that
//! back the `/summary` endpoints. Persistence and HTTP live in `farmlog-db`
//! and `farmlog-api`.

pub mod bounds;
pub mod error;
pub mod fruit;
pub mod report;
pub mod types;
pub mod validate;
