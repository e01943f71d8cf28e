//! HTTP handlers, one module per resource.

pub mod admin;
pub mod auth;
pub mod employee;
pub mod expense;
pub mod harvest;
pub mod season;
pub mod user;
pub mod workday;
