//! The nested collection reconciler.
//!
//! A client submits one list of records per child collection (materials,
//! images, colors, options, deliveries). Each record is an upsert-or-delete
//! instruction: records without an id create children, records with an id
//! and other fields update them, records carrying only an id delete them.
//!
//! The pipeline is classify ([`record`]) -> validate ([`rules`], over the
//! [`projection`] of the batch onto the persisted live set) -> apply
//! (in `attier-db`, inside one transaction, deletes before updates before
//! creates so natural-key slots vacated earlier in the batch are free for
//! later records).

pub mod points;
pub mod projection;
pub mod record;
pub mod rules;

pub use projection::Projection;
pub use record::{classify, classify_batch, Patch, RecordOp};
