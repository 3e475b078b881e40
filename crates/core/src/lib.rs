//! Pure domain logic for the Attier commerce backend.
//!
//! Everything in this crate is synchronous and I/O-free: the collection
//! reconciler, the per-collection validation policies, order pricing and
//! point distribution. Persistence lives in `attier-db`, HTTP in
//! `attier-api`.

pub mod catalog;
pub mod error;
pub mod orders;
pub mod pricing;
pub mod reconcile;
pub mod types;
