use attier_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `wholesalers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Wholesaler {
    pub id: DbId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub company_name: String,
    pub created_at: Timestamp,
}

/// DTO for wholesaler registration; the password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateWholesaler {
    pub username: String,
    pub password_hash: String,
    pub company_name: String,
}
