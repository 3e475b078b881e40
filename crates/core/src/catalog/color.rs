//! Product colors and their size options.
//!
//! Colors and options are deactivated rather than deleted because order
//! items keep referencing them. A color created without a display name takes
//! the name of the registry color it references, and that effective name is
//! what the uniqueness rules see. Deactivating a color deactivates its
//! options.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::error::CoreResult;
use crate::reconcile::record::{classify_batch, creates, non_creates, updates, Patch, RecordOp};
use crate::reconcile::{rules, Projection};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionPatch {
    pub id: Option<DbId>,
    pub size: Option<String>,
}

impl Patch for OptionPatch {
    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn present_fields(&self) -> usize {
        self.size.is_some() as usize
    }
}

#[derive(Debug, Clone)]
pub struct OptionState {
    pub id: DbId,
    pub size: String,
}

/// Validate one color's option batch against its live options.
pub fn validate_options(
    persisted: &[OptionState],
    ops: &[RecordOp<OptionPatch>],
) -> CoreResult<()> {
    for patch in creates(ops) {
        rules::require_field("size", &patch.size)?;
    }

    rules::check_batch_duplicates(
        "options",
        "Size",
        ops.iter().filter_map(|op| match op {
            RecordOp::Create(p) | RecordOp::Update { patch: p, .. } => p.size.as_deref(),
            RecordOp::Delete { .. } => None,
        }),
    )?;

    let live: HashSet<DbId> = persisted.iter().map(|o| o.id).collect();
    rules::check_known_ids(
        "options",
        "option",
        non_creates(ops).filter_map(|op| op.existing_id()),
        &live,
    )?;

    let sizes: HashMap<DbId, &str> = persisted.iter().map(|o| (o.id, o.size.as_str())).collect();
    for (id, patch) in updates(ops) {
        if let Some(size) = sizes.get(&id) {
            rules::check_immutable("options", "Size", patch.size.as_deref().as_ref(), size)?;
        }
    }

    let projected = Projection::new(
        persisted.iter().map(|o| (o.id, o.size.clone())),
        ops,
        |p| p.size.clone(),
    );
    for patch in creates(ops) {
        if let Some(size) = &patch.size {
            if projected.collides(None, size) {
                return Err(rules::projected_key_conflict("options", "option", "size"));
            }
        }
    }

    rules::check_at_least_one(
        "options",
        "product color",
        "option",
        projected.len() + creates(ops).count(),
    )?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColorPatch {
    pub id: Option<DbId>,
    /// Registry color reference.
    pub color: Option<DbId>,
    pub display_color_name: Option<String>,
    pub image_url: Option<String>,
    pub options: Option<Vec<OptionPatch>>,
}

impl Patch for ColorPatch {
    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn present_fields(&self) -> usize {
        self.color.is_some() as usize
            + self.display_color_name.is_some() as usize
            + self.image_url.is_some() as usize
            + self.options.is_some() as usize
    }
}

impl ColorPatch {
    /// The display name the patch would persist: the explicit one, or the
    /// referenced registry color's name.
    pub fn effective_display_name(&self, registry: &HashMap<DbId, String>) -> Option<String> {
        match &self.display_color_name {
            Some(name) => Some(name.clone()),
            None => self
                .color
                .and_then(|id| registry.get(&id).cloned()),
        }
    }
}

/// A live product color with its live options.
#[derive(Debug, Clone)]
pub struct ColorState {
    pub id: DbId,
    pub color: DbId,
    pub display_color_name: String,
    pub options: Vec<OptionState>,
}

/// Validate a color batch against the product's live colors.
///
/// `registry` maps every registry color id referenced by the batch to its
/// name; ids missing from it are treated as nonexistent.
pub fn validate_colors(
    persisted: &[ColorState],
    ops: &[RecordOp<ColorPatch>],
    registry: &HashMap<DbId, String>,
) -> CoreResult<()> {
    for patch in creates(ops) {
        rules::require_field("color", &patch.color)?;
        rules::require_field("image_url", &patch.image_url)?;
        rules::require_field("options", &patch.options)?;
    }

    rules::check_known_ids(
        "colors",
        "color",
        ops.iter().filter_map(|op| match op {
            RecordOp::Create(p) | RecordOp::Update { patch: p, .. } => p.color,
            RecordOp::Delete { .. } => None,
        }),
        &registry.keys().copied().collect(),
    )?;

    // The registry fallback applies to creates only; updates persist a
    // display name only when they carry one.
    rules::check_batch_duplicates(
        "colors",
        "display_color_name",
        ops.iter().filter_map(|op| match op {
            RecordOp::Create(p) => p.effective_display_name(registry),
            RecordOp::Update { patch: p, .. } => p.display_color_name.clone(),
            RecordOp::Delete { .. } => None,
        }),
    )?;

    let live: HashSet<DbId> = persisted.iter().map(|c| c.id).collect();
    rules::check_known_ids(
        "colors",
        "color",
        non_creates(ops).filter_map(|op| op.existing_id()),
        &live,
    )?;

    let registry_refs: HashMap<DbId, DbId> = persisted.iter().map(|c| (c.id, c.color)).collect();
    for (id, patch) in updates(ops) {
        if let Some(current) = registry_refs.get(&id) {
            rules::check_immutable("colors", "Color", patch.color.as_ref(), current)?;
        }
    }

    let names = Projection::new(
        persisted.iter().map(|c| (c.id, c.display_color_name.clone())),
        ops,
        |p| p.display_color_name.clone(),
    );
    for patch in creates(ops) {
        if let Some(name) = patch.effective_display_name(registry) {
            if names.collides(None, &name) {
                return Err(rules::projected_key_conflict(
                    "colors",
                    "product",
                    "display_color_name",
                ));
            }
        }
    }
    for (id, patch) in updates(ops) {
        if let Some(name) = &patch.display_color_name {
            if names.collides(Some(id), name) {
                return Err(rules::projected_key_conflict(
                    "colors",
                    "product",
                    "display_color_name",
                ));
            }
        }
    }

    let created = creates(ops).count();
    rules::check_at_least_one("colors", "product", "color", names.len() + created)?;
    rules::check_at_most_ten("colors", "product", "color", names.len() + created)?;

    // Nested option batches: a new color validates against an empty option
    // set, an updated color against its live options.
    let options_by_color: HashMap<DbId, &[OptionState]> = persisted
        .iter()
        .map(|c| (c.id, c.options.as_slice()))
        .collect();
    for patch in creates(ops) {
        if let Some(options) = &patch.options {
            validate_options(&[], &classify_batch(options.clone()))?;
        }
    }
    for (id, patch) in updates(ops) {
        if let Some(options) = &patch.options {
            let live = options_by_color.get(&id).copied().unwrap_or(&[]);
            validate_options(live, &classify_batch(options.clone()))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn registry() -> HashMap<DbId, String> {
        [(1, "Black".to_string()), (2, "Navy".to_string())]
            .into_iter()
            .collect()
    }

    fn option(id: DbId, size: &str) -> OptionState {
        OptionState {
            id,
            size: size.into(),
        }
    }

    fn persisted() -> Vec<ColorState> {
        vec![
            ColorState {
                id: 10,
                color: 1,
                display_color_name: "Black".into(),
                options: vec![option(100, "S"), option(101, "M")],
            },
            ColorState {
                id: 11,
                color: 2,
                display_color_name: "Deep Navy".into(),
                options: vec![option(102, "S")],
            },
        ]
    }

    fn create(color: DbId, display: Option<&str>, sizes: &[&str]) -> ColorPatch {
        ColorPatch {
            id: None,
            color: Some(color),
            display_color_name: display.map(Into::into),
            image_url: Some("img/color.jpg".into()),
            options: Some(
                sizes
                    .iter()
                    .map(|s| OptionPatch {
                        id: None,
                        size: Some((*s).into()),
                    })
                    .collect(),
            ),
        }
    }

    fn delete(id: DbId) -> ColorPatch {
        ColorPatch {
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
    fn create_batch_with_unique_names_passes() {
        let ops = classify_batch(vec![
            create(1, None, &["S", "M"]),
            create(2, Some("Deep Navy"), &["S"]),
        ]);
        assert!(validate_colors(&[], &ops, &registry()).is_ok());
    }

    #[test]
    fn omitted_display_name_defaults_to_registry_name_for_uniqueness() {
        // Both records resolve to "Black".
        let ops = classify_batch(vec![create(1, None, &["S"]), create(1, Some("Black"), &["M"])]);
        assert_eq!(
            message(validate_colors(&[], &ops, &registry())),
            "display_color_name is duplicated."
        );
    }

    #[test]
    fn create_colliding_with_live_name_is_rejected() {
        let ops = classify_batch(vec![create(2, Some("Black"), &["S"])]);
        assert_eq!(
            message(validate_colors(&persisted(), &ops, &registry())),
            "The product with the display_color_name already exists."
        );
    }

    #[test]
    fn name_swap_between_live_colors_passes() {
        let ops = classify_batch(vec![
            ColorPatch {
                id: Some(10),
                display_color_name: Some("Deep Navy".into()),
                ..Default::default()
            },
            ColorPatch {
                id: Some(11),
                display_color_name: Some("Black".into()),
                ..Default::default()
            },
        ]);
        assert!(validate_colors(&persisted(), &ops, &registry()).is_ok());
    }

    #[test]
    fn updates_repeating_a_shared_registry_color_pass() {
        // Two live colors reference the same registry color under distinct
        // display names. Resubmitting the immutable color field must not
        // count as a display name.
        let persisted = vec![
            ColorState {
                id: 10,
                color: 1,
                display_color_name: "Black".into(),
                options: vec![option(100, "S")],
            },
            ColorState {
                id: 11,
                color: 1,
                display_color_name: "Jet Black".into(),
                options: vec![option(102, "S")],
            },
        ];
        let ops = classify_batch(vec![
            ColorPatch {
                id: Some(10),
                color: Some(1),
                image_url: Some("img/black-2.jpg".into()),
                ..Default::default()
            },
            ColorPatch {
                id: Some(11),
                color: Some(1),
                image_url: Some("img/jet-black-2.jpg".into()),
                ..Default::default()
            },
        ]);
        assert!(validate_colors(&persisted, &ops, &registry()).is_ok());
    }

    #[test]
    fn delete_then_recreate_same_name_passes() {
        let ops = classify_batch(vec![delete(10), create(1, Some("Black"), &["S"])]);
        assert!(validate_colors(&persisted(), &ops, &registry()).is_ok());
    }

    #[test]
    fn changing_the_registry_color_is_rejected() {
        let ops = classify_batch(vec![ColorPatch {
            id: Some(10),
            color: Some(2),
            ..Default::default()
        }]);
        assert_eq!(
            message(validate_colors(&persisted(), &ops, &registry())),
            "Color data cannot be updated."
        );
    }

    #[test]
    fn unknown_registry_color_is_rejected() {
        let ops = classify_batch(vec![create(9, Some("Mint"), &["S"])]);
        assert_eq!(
            message(validate_colors(&persisted(), &ops, &registry())),
            "color 9 does not exist."
        );
    }

    #[test]
    fn deleting_the_last_color_is_rejected() {
        let ops = classify_batch(vec![delete(10), delete(11)]);
        assert_eq!(
            message(validate_colors(&persisted(), &ops, &registry())),
            "The product must have at least one color."
        );
    }

    #[test]
    fn create_missing_options_is_rejected() {
        let mut patch = create(1, Some("Mint"), &[]);
        patch.options = None;
        let ops = classify_batch(vec![patch]);
        assert_eq!(
            message(validate_colors(&persisted(), &ops, &registry())),
            "options field is required."
        );
    }

    #[test]
    fn nested_option_batch_is_validated() {
        // Empty nested batch leaves the new color without options.
        let ops = classify_batch(vec![create(1, Some("Mint"), &[])]);
        assert_eq!(
            message(validate_colors(&persisted(), &ops, &registry())),
            "The product color must have at least one option."
        );
    }

    #[test]
    fn duplicate_size_within_a_color_is_rejected() {
        let ops = classify_batch(vec![create(1, Some("Mint"), &["S", "S"])]);
        assert_eq!(
            message(validate_colors(&persisted(), &ops, &registry())),
            "Size is duplicated."
        );
    }

    #[test]
    fn nested_create_colliding_with_live_size_is_rejected() {
        let ops = classify_batch(vec![ColorPatch {
            id: Some(10),
            options: Some(vec![OptionPatch {
                id: None,
                size: Some("M".into()),
            }]),
            ..Default::default()
        }]);
        assert_eq!(
            message(validate_colors(&persisted(), &ops, &registry())),
            "The option with the size already exists."
        );
    }

    #[test]
    fn deleting_the_last_option_of_a_color_is_rejected() {
        let ops = classify_batch(vec![ColorPatch {
            id: Some(11),
            options: Some(vec![OptionPatch {
                id: Some(102),
                size: None,
            }]),
            ..Default::default()
        }]);
        assert_eq!(
            message(validate_colors(&persisted(), &ops, &registry())),
            "The product color must have at least one option."
        );
    }

    #[test]
    fn changing_an_option_size_is_rejected() {
        let ops = classify_batch(vec![ColorPatch {
            id: Some(10),
            options: Some(vec![OptionPatch {
                id: Some(100),
                size: Some("XL".into()),
            }]),
            ..Default::default()
        }]);
        assert_eq!(
            message(validate_colors(&persisted(), &ops, &registry())),
            "Size data cannot be updated."
        );
    }
}
