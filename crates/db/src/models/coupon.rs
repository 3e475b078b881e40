use attier_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `coupons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Coupon {
    pub id: DbId,
    pub name: String,
    pub discount_rate: i64,
    pub end_date: Option<NaiveDate>,
}

/// A coupon issued to a shopper, joined with the coupon fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShopperCoupon {
    pub id: DbId,
    pub coupon_id: DbId,
    pub name: String,
    pub discount_rate: i64,
    pub end_date: Option<NaiveDate>,
    pub is_used: bool,
    pub created_at: Timestamp,
}
