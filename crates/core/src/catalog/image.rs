//! Product images: physical delete, 1 to 10 per product, immutable url,
//! display sequence contiguous from 1.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::error::CoreResult;
use crate::reconcile::record::{creates, non_creates, updates, Patch, RecordOp};
use crate::reconcile::{rules, Projection};
use crate::types::DbId;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagePatch {
    pub id: Option<DbId>,
    pub image_url: Option<String>,
    pub sequence: Option<i32>,
}

impl Patch for ImagePatch {
    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn present_fields(&self) -> usize {
        self.image_url.is_some() as usize + self.sequence.is_some() as usize
    }
}

#[derive(Debug, Clone)]
pub struct ImageState {
    pub id: DbId,
    pub image_url: String,
    pub sequence: i32,
}

pub fn validate_images(persisted: &[ImageState], ops: &[RecordOp<ImagePatch>]) -> CoreResult<()> {
    for patch in creates(ops) {
        rules::require_field("image_url", &patch.image_url)?;
        rules::require_field("sequence", &patch.sequence)?;
    }

    let live: HashSet<DbId> = persisted.iter().map(|i| i.id).collect();
    rules::check_known_ids(
        "images",
        "image",
        non_creates(ops).filter_map(|op| op.existing_id()),
        &live,
    )?;

    let urls: HashMap<DbId, &str> = persisted
        .iter()
        .map(|i| (i.id, i.image_url.as_str()))
        .collect();
    for (id, patch) in updates(ops) {
        if let Some(url) = urls.get(&id) {
            rules::check_immutable("images", "Image url", patch.image_url.as_deref().as_ref(), url)?;
        }
    }

    let sequences = Projection::new(
        persisted.iter().map(|i| (i.id, i.sequence)),
        ops,
        |p| p.sequence,
    );
    let created = creates(ops).count();
    rules::check_at_least_one("images", "product", "image", sequences.len() + created)?;
    rules::check_at_most_ten("images", "product", "image", sequences.len() + created)?;

    rules::check_sequence_contiguous(
        "images",
        sequences
            .values()
            .copied()
            .chain(creates(ops).filter_map(|p| p.sequence)),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::reconcile::classify_batch;

    fn persisted(n: i32) -> Vec<ImageState> {
        (1..=n)
            .map(|i| ImageState {
                id: i as DbId,
                image_url: format!("img/{i}.jpg"),
                sequence: i,
            })
            .collect()
    }

    fn create(sequence: i32) -> ImagePatch {
        ImagePatch {
            id: None,
            image_url: Some(format!("img/new-{sequence}.jpg")),
            sequence: Some(sequence),
        }
    }

    fn delete(id: DbId) -> ImagePatch {
        ImagePatch {
            id: Some(id),
            ..Default::default()
        }
    }

    fn message(result: CoreResult<()>) -> String {
        match result {
            Err(CoreError::Validation { message, .. }) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn contiguous_create_batch_passes() {
        let ops = classify_batch(vec![create(1), create(2), create(3)]);
        assert!(validate_images(&[], &ops).is_ok());
    }

    #[test]
    fn deleting_every_image_is_rejected() {
        let ops = classify_batch(vec![delete(1), delete(2)]);
        assert_eq!(
            message(validate_images(&persisted(2), &ops)),
            "The product must have at least one image."
        );
    }

    #[test]
    fn eleventh_image_is_rejected() {
        let ops = classify_batch(vec![create(11)]);
        assert_eq!(
            message(validate_images(&persisted(10), &ops)),
            "The product cannot have more than ten images."
        );
    }

    #[test]
    fn gap_in_projected_sequences_is_rejected() {
        // Deleting sequence 2 of 3 leaves 1 and 3.
        let ops = classify_batch(vec![delete(2)]);
        assert_eq!(
            message(validate_images(&persisted(3), &ops)),
            "The sequence of the images must be ascending from 1 to n."
        );
    }

    #[test]
    fn duplicate_projected_sequence_is_rejected() {
        let ops = classify_batch(vec![create(2)]);
        assert_eq!(
            message(validate_images(&persisted(2), &ops)),
            "The sequence of the images must be ascending from 1 to n."
        );
    }

    #[test]
    fn reordering_by_swapping_sequences_passes() {
        let ops = classify_batch(vec![
            ImagePatch {
                id: Some(1),
                sequence: Some(2),
                ..Default::default()
            },
            ImagePatch {
                id: Some(2),
                sequence: Some(1),
                ..Default::default()
            },
        ]);
        assert!(validate_images(&persisted(2), &ops).is_ok());
    }

    #[test]
    fn changing_the_url_is_rejected() {
        let ops = classify_batch(vec![ImagePatch {
            id: Some(1),
            image_url: Some("img/other.jpg".into()),
            sequence: None,
        }]);
        assert_eq!(
            message(validate_images(&persisted(2), &ops)),
            "Image url data cannot be updated."
        );
    }

    #[test]
    fn unknown_image_id_is_rejected() {
        let ops = classify_batch(vec![delete(9)]);
        assert_eq!(
            message(validate_images(&persisted(2), &ops)),
            "image 9 does not exist."
        );
    }
}
