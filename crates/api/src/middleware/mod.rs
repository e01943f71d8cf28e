//! Request-level guards: JWT bearer authentication and the admin check.

pub mod auth;
