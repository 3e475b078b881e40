//! Product row, write DTOs and the detail aggregate.

use attier_core::catalog::{ColorPatch, ImagePatch, MaterialPatch};
use attier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::image::ProductImage;
use super::material::ProductMaterial;
use super::product_color::ProductColorDetail;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub wholesaler_id: DbId,
    pub sub_category_id: DbId,
    pub name: String,
    pub price: i64,
    pub sale_price: i64,
    pub base_discount_rate: i64,
    pub base_discounted_price: i64,
    pub manufacturing_country: String,
    pub on_sale: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for product creation. The nested collections are validated
/// as create-only batches.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub sub_category_id: DbId,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub base_discount_rate: i64,
    pub manufacturing_country: String,
    pub materials: Vec<MaterialPatch>,
    pub images: Vec<ImagePatch>,
    pub colors: Vec<ColorPatch>,
}

/// Request body for a partial product update. Absent collections are left
/// untouched; present ones are reconciled record by record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub sub_category_id: Option<DbId>,
    pub name: Option<String>,
    pub price: Option<i64>,
    pub base_discount_rate: Option<i64>,
    pub manufacturing_country: Option<String>,
    pub materials: Option<Vec<MaterialPatch>>,
    pub images: Option<Vec<ImagePatch>>,
    pub colors: Option<Vec<ColorPatch>>,
}

/// A product with its live nested collections.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub materials: Vec<ProductMaterial>,
    pub images: Vec<ProductImage>,
    pub colors: Vec<ProductColorDetail>,
}
