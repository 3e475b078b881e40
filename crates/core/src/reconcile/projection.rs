//! Projected end state: the live child set as it will exist immediately
//! after the batch's deletes and updates are applied, before creates.
//!
//! Uniqueness and sum validators run against this projection rather than
//! the pre-mutation set, which is what makes key-swap and
//! delete-then-recreate batches legal in a single request.

use std::collections::HashMap;

use crate::types::DbId;

use super::record::{Patch, RecordOp};

/// One projected value per surviving child, keyed by child id.
///
/// `V` is whatever the validator cares about: the natural key for
/// uniqueness checks, a numeric field for sum checks.
#[derive(Debug)]
pub struct Projection<V> {
    by_id: HashMap<DbId, V>,
}

impl<V> Projection<V> {
    /// Project `persisted` (the live children) past the batch's deletes and
    /// updates. `patched` extracts the new value from an update patch when
    /// the patch carries the relevant field; absent fields keep the
    /// persisted value.
    pub fn new<P: Patch>(
        persisted: impl IntoIterator<Item = (DbId, V)>,
        ops: &[RecordOp<P>],
        mut patched: impl FnMut(&P) -> Option<V>,
    ) -> Self {
        let mut by_id: HashMap<DbId, V> = persisted.into_iter().collect();

        for op in ops {
            match op {
                RecordOp::Delete { id } => {
                    by_id.remove(id);
                }
                RecordOp::Update { id, patch } => {
                    if let Some(value) = patched(patch) {
                        if let Some(slot) = by_id.get_mut(id) {
                            *slot = value;
                        }
                    }
                }
                RecordOp::Create(_) => {}
            }
        }

        Self { by_id }
    }

    /// Number of children surviving the batch (creates not included).
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.by_id.values()
    }

    /// True when a child *other than* `child_id` holds `value` in the
    /// projected state. Pass `None` for create records, which have no id of
    /// their own to exclude.
    pub fn collides(&self, child_id: Option<DbId>, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.by_id
            .iter()
            .any(|(id, v)| Some(*id) != child_id && v == value)
    }
}

impl<V: Copy + Into<i64>> Projection<V> {
    /// Sum of the projected values, for exact-total invariants.
    pub fn sum(&self) -> i64 {
        self.by_id.values().map(|v| (*v).into()).sum()
    }
}
