use attier_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `main_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MainCategory {
    pub id: DbId,
    pub name: String,
}

/// A row from the `sub_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubCategory {
    pub id: DbId,
    pub main_category_id: DbId,
    pub name: String,
}

/// A main category with its sub categories, as returned by the listing.
#[derive(Debug, Clone, Serialize)]
pub struct MainCategoryWithSubs {
    pub id: DbId,
    pub name: String,
    pub sub_categories: Vec<SubCategory>,
}
