//! Shopper account, membership and saved shipping address models.

use attier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `shoppers` table joined with its membership.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Shopper {
    pub id: DbId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub nickname: String,
    pub mobile_number: String,
    pub point: i64,
    pub membership_id: DbId,
    pub membership_name: String,
    pub membership_discount_rate: i64,
    pub created_at: Timestamp,
}

/// DTO for shopper registration; the password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateShopper {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub nickname: Option<String>,
    pub mobile_number: String,
}

/// Request body for a partial shopper update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShopper {
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub mobile_number: Option<String>,
}

/// A row from the `shopper_shipping_addresses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShippingAddress {
    pub id: DbId,
    pub shopper_id: DbId,
    pub name: String,
    pub receiver_name: String,
    pub mobile_number: String,
    pub phone_number: Option<String>,
    pub zip_code: String,
    pub base_address: String,
    pub detail_address: String,
    pub is_default: bool,
}

/// Request body for saving a shipping address.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShippingAddress {
    pub name: String,
    pub receiver_name: String,
    pub mobile_number: String,
    pub phone_number: Option<String>,
    pub zip_code: String,
    pub base_address: String,
    pub detail_address: String,
    #[serde(default)]
    pub is_default: bool,
}

/// A row from the `point_histories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PointHistory {
    pub id: DbId,
    pub shopper_id: DbId,
    pub order_id: Option<DbId>,
    pub point_change: i64,
    pub content: String,
    pub created_at: Timestamp,
}
