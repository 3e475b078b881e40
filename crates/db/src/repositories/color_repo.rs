use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::color::Color;

/// Read-only access to the color registry.
pub struct ColorRepo;

impl ColorRepo {
    pub async fn list(pool: &PgPool) -> DbResult<Vec<Color>> {
        let colors = sqlx::query_as::<_, Color>("SELECT id, name FROM colors ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(colors)
    }
}
