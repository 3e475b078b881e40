use attier_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `colors` registry table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Color {
    pub id: DbId,
    pub name: String,
}
