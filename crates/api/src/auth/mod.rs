//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`basic`] -- HTTP Basic credential parsing for the account-creation guard.

pub mod basic;
pub mod jwt;
pub mod password;
