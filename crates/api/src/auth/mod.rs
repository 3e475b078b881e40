//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.

pub mod jwt;
pub mod password;

/// `user_type` claim for shopper accounts.
pub const USER_TYPE_SHOPPER: &str = "shopper";
/// `user_type` claim for wholesaler accounts.
pub const USER_TYPE_WHOLESALER: &str = "wholesaler";
