use attier_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `product_materials` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductMaterial {
    pub id: DbId,
    pub product_id: DbId,
    pub material: String,
    pub mixing_rate: i64,
}
