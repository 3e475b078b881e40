//! Product materials: physical delete, unique material name, mixing rates
//! summing to exactly 100.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::CoreResult;
use crate::reconcile::record::{creates, non_creates, updates, Patch, RecordOp};
use crate::reconcile::{rules, Projection};
use crate::types::DbId;

pub const MIXING_RATE_TOTAL: i64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialPatch {
    pub id: Option<DbId>,
    pub material: Option<String>,
    pub mixing_rate: Option<i64>,
}

impl Patch for MaterialPatch {
    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn present_fields(&self) -> usize {
        self.material.is_some() as usize + self.mixing_rate.is_some() as usize
    }
}

/// A persisted material row, as loaded for validation.
#[derive(Debug, Clone)]
pub struct MaterialState {
    pub id: DbId,
    pub material: String,
    pub mixing_rate: i64,
}

pub fn validate_materials(
    persisted: &[MaterialState],
    ops: &[RecordOp<MaterialPatch>],
) -> CoreResult<()> {
    for patch in creates(ops) {
        rules::require_field("material", &patch.material)?;
        rules::require_field("mixing_rate", &patch.mixing_rate)?;
    }

    rules::check_batch_duplicates(
        "materials",
        "Material",
        ops.iter().filter_map(|op| match op {
            RecordOp::Create(p) | RecordOp::Update { patch: p, .. } => p.material.as_deref(),
            RecordOp::Delete { .. } => None,
        }),
    )?;

    let live: HashSet<DbId> = persisted.iter().map(|m| m.id).collect();
    rules::check_known_ids(
        "materials",
        "material",
        non_creates(ops).filter_map(|op| op.existing_id()),
        &live,
    )?;

    let names = Projection::new(
        persisted.iter().map(|m| (m.id, m.material.clone())),
        ops,
        |p| p.material.clone(),
    );
    for patch in creates(ops) {
        if let Some(material) = &patch.material {
            if names.collides(None, material) {
                return Err(rules::projected_key_conflict("materials", "product", "material"));
            }
        }
    }
    for (id, patch) in updates(ops) {
        if let Some(material) = &patch.material {
            if names.collides(Some(id), material) {
                return Err(rules::projected_key_conflict("materials", "product", "material"));
            }
        }
    }

    let rates = Projection::new(
        persisted.iter().map(|m| (m.id, m.mixing_rate)),
        ops,
        |p| p.mixing_rate,
    );
    let created_rates: i64 = creates(ops).filter_map(|p| p.mixing_rate).sum();
    rules::check_exact_sum(
        "materials",
        rates.sum() + created_rates,
        MIXING_RATE_TOTAL,
        "The total of material mixing rates must be 100.",
    )?;

    Ok(())
}
