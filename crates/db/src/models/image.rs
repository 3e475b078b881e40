use attier_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `product_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductImage {
    pub id: DbId,
    pub product_id: DbId,
    pub image_url: String,
    pub sequence: i32,
}
