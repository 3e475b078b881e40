//! Generic validation rules shared by every reconciled collection.
//!
//! Each collection wires these up with its own field names and labels; the
//! message templates stay identical across collections. Rules run in the
//! order the caller invokes them and short-circuit on the first failure.

use std::collections::HashSet;
use std::hash::Hash;

use crate::error::{CoreError, CoreResult};
use crate::types::DbId;

/// Required-on-create: a create record must carry `field`.
pub fn require_field<T>(field: &'static str, value: &Option<T>) -> CoreResult<()> {
    if value.is_none() {
        return Err(CoreError::validation(
            field,
            format!("{field} field is required."),
        ));
    }
    Ok(())
}

/// Batch uniqueness: no two records in one batch may carry the same natural
/// key. `label` is the display name used in the message ("Material",
/// "display_color_name", ...).
pub fn check_batch_duplicates<K: Eq + Hash>(
    field: &'static str,
    label: &str,
    keys: impl IntoIterator<Item = K>,
) -> CoreResult<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(CoreError::validation(
                field,
                format!("{label} is duplicated."),
            ));
        }
    }
    Ok(())
}

/// Existence: update and delete records must reference currently-live
/// children of this parent.
pub fn check_known_ids(
    field: &'static str,
    label: &str,
    submitted: impl IntoIterator<Item = DbId>,
    live: &HashSet<DbId>,
) -> CoreResult<()> {
    for id in submitted {
        if !live.contains(&id) {
            return Err(CoreError::validation(
                field,
                format!("{label} {id} does not exist."),
            ));
        }
    }
    Ok(())
}

/// Immutability: an update record may repeat an immutable field's persisted
/// value but may not change it.
pub fn check_immutable<T: PartialEq>(
    field: &'static str,
    label: &str,
    submitted: Option<&T>,
    persisted: &T,
) -> CoreResult<()> {
    if let Some(value) = submitted {
        if value != persisted {
            return Err(CoreError::validation(
                field,
                format!("{label} data cannot be updated."),
            ));
        }
    }
    Ok(())
}

/// Projected uniqueness failed: a create or key-changing update collides
/// with a different surviving child.
pub fn projected_key_conflict(field: &'static str, parent: &str, key_label: &str) -> CoreError {
    CoreError::validation(
        field,
        format!("The {parent} with the {key_label} already exists."),
    )
}

/// Lower cardinality bound. Every bounded collection here has min 1.
pub fn check_at_least_one(
    field: &'static str,
    parent: &str,
    unit: &str,
    projected_len: usize,
) -> CoreResult<()> {
    if projected_len < 1 {
        return Err(CoreError::validation(
            field,
            format!("The {parent} must have at least one {unit}."),
        ));
    }
    Ok(())
}

/// Upper cardinality bound. Every bounded collection here has max 10.
pub fn check_at_most_ten(
    field: &'static str,
    parent: &str,
    unit: &str,
    projected_len: usize,
) -> CoreResult<()> {
    if projected_len > 10 {
        return Err(CoreError::validation(
            field,
            format!("The {parent} cannot have more than ten {unit}s."),
        ));
    }
    Ok(())
}

/// Exact-sum invariant over the projected collection.
pub fn check_exact_sum(
    field: &'static str,
    actual: i64,
    expected: i64,
    message: &str,
) -> CoreResult<()> {
    if actual != expected {
        return Err(CoreError::validation(field, message));
    }
    Ok(())
}

/// Image sequence contiguity: the projected sequences, sorted, must be
/// exactly 1..=n.
pub fn check_sequence_contiguous(
    field: &'static str,
    sequences: impl IntoIterator<Item = i32>,
) -> CoreResult<()> {
    let mut sequences: Vec<i32> = sequences.into_iter().collect();
    sequences.sort_unstable();

    let contiguous = sequences
        .iter()
        .enumerate()
        .all(|(i, seq)| *seq == i as i32 + 1);
    if !contiguous {
        return Err(CoreError::validation(
            field,
            "The sequence of the images must be ascending from 1 to n.",
        ));
    }
    Ok(())
}
