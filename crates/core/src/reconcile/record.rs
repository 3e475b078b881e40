//! Record classification: CREATE / UPDATE / DELETE by key presence.

use crate::types::DbId;

/// A deserialized child record in which every business field is optional.
///
/// Implementors report their optional id and how many non-id fields the
/// client actually supplied; classification needs nothing else.
pub trait Patch {
    /// The identifier field, when present.
    fn id(&self) -> Option<DbId>;

    /// Number of non-id fields the record carries.
    fn present_fields(&self) -> usize;
}

/// A classified child record.
///
/// Downstream code matches exhaustively on this instead of probing field
/// presence, so an ill-formed combination cannot slip past the validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOp<P> {
    /// No id: create a new child from the supplied fields.
    Create(P),
    /// Id plus fields: partially update the referenced child.
    Update { id: DbId, patch: P },
    /// Id only: remove (or deactivate) the referenced child.
    Delete { id: DbId },
}

impl<P> RecordOp<P> {
    /// The referenced child id for updates and deletes.
    pub fn existing_id(&self) -> Option<DbId> {
        match self {
            RecordOp::Create(_) => None,
            RecordOp::Update { id, .. } | RecordOp::Delete { id } => Some(*id),
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, RecordOp::Delete { .. })
    }

    pub fn is_create(&self) -> bool {
        matches!(self, RecordOp::Create(_))
    }
}

/// Classify a single record. Classification is total: the only input that
/// produces no operation is the degenerate empty record, which is a no-op.
pub fn classify<P: Patch>(patch: P) -> Option<RecordOp<P>> {
    match (patch.id(), patch.present_fields()) {
        (None, 0) => None,
        (None, _) => Some(RecordOp::Create(patch)),
        (Some(id), 0) => Some(RecordOp::Delete { id }),
        (Some(id), _) => Some(RecordOp::Update { id, patch }),
    }
}

/// Classify a whole batch, preserving submission order and dropping empty
/// records.
pub fn classify_batch<P: Patch>(patches: Vec<P>) -> Vec<RecordOp<P>> {
    patches.into_iter().filter_map(classify).collect()
}

/// Create records in the batch.
pub fn creates<P>(ops: &[RecordOp<P>]) -> impl Iterator<Item = &P> {
    ops.iter().filter_map(|op| match op {
        RecordOp::Create(patch) => Some(patch),
        _ => None,
    })
}

/// Update records in the batch as `(id, patch)` pairs.
pub fn updates<P>(ops: &[RecordOp<P>]) -> impl Iterator<Item = (DbId, &P)> {
    ops.iter().filter_map(|op| match op {
        RecordOp::Update { id, patch } => Some((*id, patch)),
        _ => None,
    })
}

/// Ids of delete records in the batch.
pub fn delete_ids<P>(ops: &[RecordOp<P>]) -> impl Iterator<Item = DbId> + '_ {
    ops.iter().filter_map(|op| match op {
        RecordOp::Delete { id } => Some(*id),
        _ => None,
    })
}

/// The create-or-update view: records that will be live after the batch.
pub fn non_deletes<P>(ops: &[RecordOp<P>]) -> impl Iterator<Item = &RecordOp<P>> {
    ops.iter().filter(|op| !op.is_delete())
}

/// The update-or-delete view: records referencing already-existing children.
pub fn non_creates<P>(ops: &[RecordOp<P>]) -> impl Iterator<Item = &RecordOp<P>> {
    ops.iter().filter(|op| !op.is_create())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct TestPatch {
        id: Option<DbId>,
        name: Option<&'static str>,
        rate: Option<i32>,
    }

    impl Patch for TestPatch {
        fn id(&self) -> Option<DbId> {
            self.id
        }

        fn present_fields(&self) -> usize {
            self.name.is_some() as usize + self.rate.is_some() as usize
        }
    }

    fn create(name: &'static str) -> TestPatch {
        TestPatch {
            name: Some(name),
            ..Default::default()
        }
    }

    fn update(id: DbId, name: &'static str) -> TestPatch {
        TestPatch {
            id: Some(id),
            name: Some(name),
            ..Default::default()
        }
    }

    fn delete(id: DbId) -> TestPatch {
        TestPatch {
            id: Some(id),
            ..Default::default()
        }
    }

    #[test]
    fn no_id_with_fields_is_create() {
        assert!(matches!(classify(create("wool")), Some(RecordOp::Create(_))));
    }

    #[test]
    fn id_with_fields_is_update() {
        assert!(matches!(
            classify(update(3, "wool")),
            Some(RecordOp::Update { id: 3, .. })
        ));
    }

    #[test]
    fn id_only_is_delete() {
        assert_eq!(classify(delete(7)), Some(RecordOp::Delete { id: 7 }));
    }

    #[test]
    fn empty_record_is_no_op() {
        assert_eq!(classify(TestPatch::default()), None);
    }

    #[test]
    fn batch_preserves_order_and_drops_empties() {
        let ops = classify_batch(vec![
            create("a"),
            TestPatch::default(),
            delete(1),
            update(2, "b"),
        ]);

        assert_eq!(ops.len(), 3);
        assert!(ops[0].is_create());
        assert!(ops[1].is_delete());
        assert_eq!(ops[2].existing_id(), Some(2));
    }

    #[test]
    fn partitions_split_the_batch() {
        let ops = classify_batch(vec![create("a"), update(1, "b"), delete(2)]);

        assert_eq!(creates(&ops).count(), 1);
        assert_eq!(updates(&ops).map(|(id, _)| id).collect::<Vec<_>>(), [1]);
        assert_eq!(delete_ids(&ops).collect::<Vec<_>>(), [2]);
        assert_eq!(non_deletes(&ops).count(), 2);
        assert_eq!(non_creates(&ops).count(), 2);
    }
}
