use sqlx::PgPool;

use attier_core::error::CoreError;
use attier_core::types::DbId;

use crate::error::DbResult;
use crate::models::coupon::{Coupon, ShopperCoupon};

/// Provides coupon listing and issuance.
pub struct CouponRepo;

impl CouponRepo {
    /// Coupons currently issuable: no end date or one in the future.
    pub async fn list(pool: &PgPool) -> DbResult<Vec<Coupon>> {
        let coupons = sqlx::query_as::<_, Coupon>(
            "SELECT id, name, discount_rate, end_date FROM coupons
             WHERE end_date IS NULL OR end_date >= CURRENT_DATE
             ORDER BY id",
        )
        .fetch_all(pool)
        .await?;
        Ok(coupons)
    }

    pub async fn list_for_shopper(pool: &PgPool, shopper_id: DbId) -> DbResult<Vec<ShopperCoupon>> {
        let coupons = sqlx::query_as::<_, ShopperCoupon>(
            "SELECT sc.id, sc.coupon_id, c.name, c.discount_rate, c.end_date,
                    sc.is_used, sc.created_at
             FROM shopper_coupons sc
             JOIN coupons c ON c.id = sc.coupon_id
             WHERE sc.shopper_id = $1
             ORDER BY sc.id",
        )
        .bind(shopper_id)
        .fetch_all(pool)
        .await?;
        Ok(coupons)
    }

    /// Issue a coupon to a shopper. A second issue of the same coupon hits
    /// the unique constraint and surfaces as a conflict.
    pub async fn issue(pool: &PgPool, shopper_id: DbId, coupon_id: DbId) -> DbResult<ShopperCoupon> {
        let exists: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM coupons WHERE id = $1
             AND (end_date IS NULL OR end_date >= CURRENT_DATE)",
        )
        .bind(coupon_id)
        .fetch_optional(pool)
        .await?;
        if exists.is_none() {
            return Err(CoreError::NotFound { entity: "coupon", id: coupon_id }.into());
        }

        let id: (DbId,) = sqlx::query_as(
            "INSERT INTO shopper_coupons (shopper_id, coupon_id)
             VALUES ($1, $2)
             RETURNING id",
        )
        .bind(shopper_id)
        .bind(coupon_id)
        .fetch_one(pool)
        .await?;

        let coupon = sqlx::query_as::<_, ShopperCoupon>(
            "SELECT sc.id, sc.coupon_id, c.name, c.discount_rate, c.end_date,
                    sc.is_used, sc.created_at
             FROM shopper_coupons sc
             JOIN coupons c ON c.id = sc.coupon_id
             WHERE sc.id = $1",
        )
        .bind(id.0)
        .fetch_one(pool)
        .await?;
        Ok(coupon)
    }
}
