use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::category::{MainCategory, MainCategoryWithSubs, SubCategory};

/// Read-only access to the category tree.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List main categories with their sub categories.
    pub async fn list(pool: &PgPool) -> DbResult<Vec<MainCategoryWithSubs>> {
        let mains = sqlx::query_as::<_, MainCategory>(
            "SELECT id, name FROM main_categories ORDER BY id",
        )
        .fetch_all(pool)
        .await?;

        let subs = sqlx::query_as::<_, SubCategory>(
            "SELECT id, main_category_id, name FROM sub_categories ORDER BY id",
        )
        .fetch_all(pool)
        .await?;

        Ok(mains
            .into_iter()
            .map(|main| MainCategoryWithSubs {
                sub_categories: subs
                    .iter()
                    .filter(|s| s.main_category_id == main.id)
                    .cloned()
                    .collect(),
                id: main.id,
                name: main.name,
            })
            .collect())
    }
}
