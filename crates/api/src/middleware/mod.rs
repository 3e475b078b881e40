//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated account from a JWT
//!   Bearer token.
//! - [`rbac::RequireShopper`] -- Requires a shopper account.
//! - [`rbac::RequireWholesaler`] -- Requires a wholesaler account.

pub mod auth;
pub mod rbac;
