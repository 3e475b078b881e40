//! Order, order item and status history models plus write DTOs.

use attier_core::orders::OrderItemRequest;
use attier_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `orders` table. The shipping address is embedded.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub number: String,
    pub shopper_id: DbId,
    pub receiver_name: String,
    pub mobile_number: String,
    pub phone_number: Option<String>,
    pub zip_code: String,
    pub base_address: String,
    pub detail_address: String,
    pub shipping_message: String,
    pub created_at: Timestamp,
}

/// A row from the `order_items` table, joined with option and product
/// display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: DbId,
    pub order_id: DbId,
    pub option_id: DbId,
    pub status_id: i32,
    pub count: i64,
    pub sale_price: i64,
    pub base_discount_price: i64,
    pub membership_discount_price: i64,
    pub shopper_coupon_id: Option<DbId>,
    pub coupon_discount_price: i64,
    pub used_point: i64,
    pub payment_price: i64,
    pub earned_point: i64,
    pub delivery_id: Option<DbId>,
    pub product_id: DbId,
    pub product_name: String,
    pub size: String,
    pub display_color_name: String,
}

/// An order with its items, as returned by the read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// The shipping address block of an order request.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingAddressPayload {
    pub receiver_name: String,
    pub mobile_number: String,
    pub phone_number: Option<String>,
    pub zip_code: String,
    pub base_address: String,
    pub detail_address: String,
    #[serde(default)]
    pub shipping_message: String,
}

/// Request body for order creation. Every price figure is client-computed
/// and re-validated against the persisted catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub shipping_address: ShippingAddressPayload,
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub used_point: i64,
    pub actual_payment_price: i64,
    pub earned_point: i64,
}

/// Request body for swapping an order item's option.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeOption {
    pub option: DbId,
}

/// A row from the `status_histories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusHistory {
    pub id: DbId,
    pub order_item_id: DbId,
    pub status_id: i32,
    pub created_at: Timestamp,
}
