use sqlx::PgPool;

use attier_core::types::DbId;

use crate::error::DbResult;
use crate::models::wholesaler::{CreateWholesaler, Wholesaler};

/// Column list for wholesalers queries.
const COLUMNS: &str = "id, username, password_hash, company_name, created_at";

/// Provides account operations for wholesalers.
pub struct WholesalerRepo;

impl WholesalerRepo {
    pub async fn create(pool: &PgPool, input: &CreateWholesaler) -> DbResult<Wholesaler> {
        let query = format!(
            "INSERT INTO wholesalers (username, password_hash, company_name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let wholesaler = sqlx::query_as::<_, Wholesaler>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.company_name)
            .fetch_one(pool)
            .await?;
        Ok(wholesaler)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<Option<Wholesaler>> {
        let query = format!("SELECT {COLUMNS} FROM wholesalers WHERE id = $1");
        let wholesaler = sqlx::query_as::<_, Wholesaler>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(wholesaler)
    }

    pub async fn find_by_username(pool: &PgPool, username: &str) -> DbResult<Option<Wholesaler>> {
        let query = format!("SELECT {COLUMNS} FROM wholesalers WHERE username = $1");
        let wholesaler = sqlx::query_as::<_, Wholesaler>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(wholesaler)
    }
}
