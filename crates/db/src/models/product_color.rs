use attier_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `product_colors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductColor {
    pub id: DbId,
    pub product_id: DbId,
    pub color_id: DbId,
    pub display_color_name: String,
    pub image_url: String,
    pub on_sale: bool,
}

/// A row from the `options` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductOption {
    pub id: DbId,
    pub product_color_id: DbId,
    pub size: String,
    pub on_sale: bool,
}

/// A live product color with its live options, as embedded in the product
/// detail response.
#[derive(Debug, Clone, Serialize)]
pub struct ProductColorDetail {
    pub id: DbId,
    pub color_id: DbId,
    pub display_color_name: String,
    pub image_url: String,
    pub options: Vec<ProductOption>,
}
