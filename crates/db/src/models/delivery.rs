use attier_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `deliveries` table. All deliveries registered in one
/// batch share the same `flag`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Delivery {
    pub id: DbId,
    pub company: String,
    pub invoice_number: String,
    pub flag: String,
    pub created_at: Timestamp,
}
