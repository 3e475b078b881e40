//! Repository for orders and order items.
//!
//! Order creation validates the client-computed price breakdown against the
//! live catalog, spreads points over the lines, then writes the order, its
//! items, their status trail and the shopper's point deduction in one
//! transaction.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use rand::Rng;
use sqlx::{PgPool, Postgres, Transaction};

use attier_core::error::CoreError;
use attier_core::orders::{
    price_items, status, validate_items, validate_option_change, validate_totals, OptionPricing,
};
use attier_core::types::DbId;

use crate::error::DbResult;
use crate::models::order::{
    ChangeOption, CreateOrder, Order, OrderDetail, OrderItem, ShippingAddressPayload,
};

/// Column list for orders queries.
const ORDER_COLUMNS: &str = "id, number, shopper_id, receiver_name, mobile_number, \
    phone_number, zip_code, base_address, detail_address, shipping_message, created_at";

/// Column list for order items joined with option and product display fields.
const ITEM_COLUMNS: &str = "oi.id, oi.order_id, oi.option_id, oi.status_id, oi.count, \
    oi.sale_price, oi.base_discount_price, oi.membership_discount_price, \
    oi.shopper_coupon_id, oi.coupon_discount_price, oi.used_point, \
    oi.payment_price, oi.earned_point, oi.delivery_id, p.id AS product_id, \
    p.name AS product_name, o.size, pc.display_color_name";

const ITEM_JOINS: &str = "FROM order_items oi
    JOIN options o ON o.id = oi.option_id
    JOIN product_colors pc ON pc.id = o.product_color_id
    JOIN products p ON p.id = pc.product_id";

/// Provides order operations for shoppers.
pub struct OrderRepo;

impl OrderRepo {
    /// Place an order. The whole flow runs inside one transaction; any
    /// rejection leaves the shopper's point balance, coupons and the order
    /// tables untouched. Coupons referenced by the lines are marked used.
    pub async fn create(pool: &PgPool, shopper_id: DbId, input: &CreateOrder) -> DbResult<OrderDetail> {
        let mut tx = pool.begin().await?;

        let shopper: (i64, i64) = sqlx::query_as(
            "SELECT s.point, m.discount_rate FROM shoppers s
             JOIN memberships m ON m.id = s.membership_id
             WHERE s.id = $1
             FOR UPDATE OF s",
        )
        .bind(shopper_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound { entity: "shopper", id: shopper_id })?;
        let (shopper_point, membership_rate) = shopper;

        let option_ids: Vec<DbId> = input.items.iter().map(|i| i.option).collect();
        let pricing = load_option_pricing(&mut tx, &option_ids).await?;

        let coupon_ids: Vec<DbId> = input.items.iter().filter_map(|i| i.shopper_coupon).collect();
        let coupon_rates = load_coupon_rates(&mut tx, shopper_id, &coupon_ids).await?;

        validate_items(&input.items, &pricing, membership_rate, &coupon_rates)?;
        validate_totals(
            &input.items,
            input.used_point,
            input.actual_payment_price,
            input.earned_point,
            shopper_point,
        )?;
        let priced = price_items(&input.items, input.used_point)?;

        let address = &input.shipping_address;
        let query = format!(
            "INSERT INTO orders
                (number, shopper_id, receiver_name, mobile_number, phone_number,
                 zip_code, base_address, detail_address, shipping_message)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(order_number())
            .bind(shopper_id)
            .bind(&address.receiver_name)
            .bind(&address.mobile_number)
            .bind(&address.phone_number)
            .bind(&address.zip_code)
            .bind(&address.base_address)
            .bind(&address.detail_address)
            .bind(&address.shipping_message)
            .fetch_one(&mut *tx)
            .await?;

        for item in &priced {
            let item_id: (DbId,) = sqlx::query_as(
                "INSERT INTO order_items
                    (order_id, option_id, status_id, count, sale_price, base_discount_price,
                     membership_discount_price, shopper_coupon_id, coupon_discount_price,
                     used_point, payment_price, earned_point)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                 RETURNING id",
            )
            .bind(order.id)
            .bind(item.option)
            .bind(status::DEPOSIT_WAITING)
            .bind(item.count)
            .bind(item.sale_price)
            .bind(item.base_discount_price)
            .bind(item.membership_discount_price)
            .bind(item.shopper_coupon)
            .bind(item.coupon_discount_price)
            .bind(item.used_point)
            .bind(item.payment_price)
            .bind(item.earned_point)
            .fetch_one(&mut *tx)
            .await?;

            record_status(&mut tx, item_id.0, status::DEPOSIT_WAITING).await?;
        }

        if !coupon_ids.is_empty() {
            sqlx::query("UPDATE shopper_coupons SET is_used = TRUE WHERE id = ANY($1)")
                .bind(&coupon_ids)
                .execute(&mut *tx)
                .await?;
        }

        if input.used_point > 0 {
            sqlx::query("UPDATE shoppers SET point = point - $2, updated_at = now() WHERE id = $1")
                .bind(shopper_id)
                .bind(input.used_point)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                "INSERT INTO point_histories (shopper_id, order_id, point_change, content)
                 VALUES ($1, $2, $3, 'order payment')",
            )
            .bind(shopper_id)
            .bind(order.id)
            .bind(-input.used_point)
            .execute(&mut *tx)
            .await?;
        }

        let items = load_items(&mut tx, order.id).await?;
        tx.commit().await?;
        Ok(OrderDetail { order, items })
    }

    /// List the shopper's orders with items, newest first.
    pub async fn list_for_shopper(pool: &PgPool, shopper_id: DbId) -> DbResult<Vec<OrderDetail>> {
        let query = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE shopper_id = $1 ORDER BY id DESC"
        );
        let orders = sqlx::query_as::<_, Order>(&query)
            .bind(shopper_id)
            .fetch_all(pool)
            .await?;

        let mut tx = pool.begin().await?;
        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            let items = load_items(&mut tx, order.id).await?;
            details.push(OrderDetail { order, items });
        }
        tx.commit().await?;
        Ok(details)
    }

    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
        shopper_id: DbId,
    ) -> DbResult<Option<OrderDetail>> {
        let query = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND shopper_id = $2"
        );
        let Some(order) = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(shopper_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let mut tx = pool.begin().await?;
        let items = load_items(&mut tx, order.id).await?;
        tx.commit().await?;
        Ok(Some(OrderDetail { order, items }))
    }

    /// Replace the embedded shipping address of an order.
    pub async fn update_shipping_address(
        pool: &PgPool,
        id: DbId,
        shopper_id: DbId,
        address: &ShippingAddressPayload,
    ) -> DbResult<Order> {
        let query = format!(
            "UPDATE orders SET
                receiver_name = $3, mobile_number = $4, phone_number = $5,
                zip_code = $6, base_address = $7, detail_address = $8,
                shipping_message = $9
             WHERE id = $1 AND shopper_id = $2
             RETURNING {ORDER_COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(shopper_id)
            .bind(&address.receiver_name)
            .bind(&address.mobile_number)
            .bind(&address.phone_number)
            .bind(&address.zip_code)
            .bind(&address.base_address)
            .bind(&address.detail_address)
            .bind(&address.shipping_message)
            .fetch_optional(pool)
            .await?
            .ok_or(CoreError::NotFound { entity: "order", id })?;
        Ok(order)
    }

    /// Swap an order item's option before it enters delivery.
    pub async fn change_option(
        pool: &PgPool,
        order_id: DbId,
        item_id: DbId,
        shopper_id: DbId,
        input: &ChangeOption,
    ) -> DbResult<OrderItem> {
        let mut tx = pool.begin().await?;

        let item: (i32, DbId) = sqlx::query_as(
            "SELECT oi.status_id, p.id
             FROM order_items oi
             JOIN orders ord ON ord.id = oi.order_id
             JOIN options o ON o.id = oi.option_id
             JOIN product_colors pc ON pc.id = o.product_color_id
             JOIN products p ON p.id = pc.product_id
             WHERE oi.id = $1 AND oi.order_id = $2 AND ord.shopper_id = $3
             FOR UPDATE OF oi",
        )
        .bind(item_id)
        .bind(order_id)
        .bind(shopper_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CoreError::NotFound { entity: "order item", id: item_id })?;
        let (item_status, current_product) = item;

        let new_option: Option<(DbId,)> = sqlx::query_as(
            "SELECT p.id FROM options o
             JOIN product_colors pc ON pc.id = o.product_color_id
             JOIN products p ON p.id = pc.product_id
             WHERE o.id = $1 AND o.on_sale AND pc.on_sale AND p.on_sale",
        )
        .bind(input.option)
        .fetch_optional(&mut *tx)
        .await?;
        let new_product = new_option
            .map(|p| p.0)
            .ok_or_else(|| {
                CoreError::validation("option", format!("option {} does not exist.", input.option))
            })?;

        let in_order: Vec<(DbId,)> =
            sqlx::query_as("SELECT option_id FROM order_items WHERE order_id = $1")
                .bind(order_id)
                .fetch_all(&mut *tx)
                .await?;
        let in_order: HashSet<DbId> = in_order.into_iter().map(|o| o.0).collect();

        validate_option_change(item_status, current_product, new_product, input.option, &in_order)?;

        sqlx::query("UPDATE order_items SET option_id = $2 WHERE id = $1")
            .bind(item_id)
            .bind(input.option)
            .execute(&mut *tx)
            .await?;

        let item = load_item(&mut tx, item_id).await?;
        tx.commit().await?;
        Ok(item)
    }
}

/// `%Y%m%d%H%M%S` prefix plus five random digits.
fn order_number() -> String {
    let suffix: u32 = rand::rng().random_range(0..100_000);
    format!("{}{suffix:05}", Utc::now().format("%Y%m%d%H%M%S"))
}

/// Per-unit prices for every live option in `ids`, keyed by option id.
async fn load_option_pricing(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[DbId],
) -> Result<HashMap<DbId, OptionPricing>, sqlx::Error> {
    let rows: Vec<(DbId, DbId, i64, i64)> = sqlx::query_as(
        "SELECT o.id, p.id, p.sale_price, p.base_discounted_price
         FROM options o
         JOIN product_colors pc ON pc.id = o.product_color_id
         JOIN products p ON p.id = pc.product_id
         WHERE o.id = ANY($1) AND o.on_sale AND pc.on_sale AND p.on_sale",
    )
    .bind(ids)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(option, product, sale_price, base_discounted_price)| {
            (
                option,
                OptionPricing {
                    product,
                    sale_price,
                    base_discounted_price,
                },
            )
        })
        .collect())
}

/// Discount rates of the shopper's usable coupons among `ids`, keyed by
/// shopper coupon id. Used, expired or foreign coupons are left out and so
/// read as nonexistent during validation.
async fn load_coupon_rates(
    tx: &mut Transaction<'_, Postgres>,
    shopper_id: DbId,
    ids: &[DbId],
) -> Result<HashMap<DbId, i64>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(DbId, i64)> = sqlx::query_as(
        "SELECT sc.id, c.discount_rate
         FROM shopper_coupons sc
         JOIN coupons c ON c.id = sc.coupon_id
         WHERE sc.id = ANY($1) AND sc.shopper_id = $2 AND NOT sc.is_used
           AND (c.end_date IS NULL OR c.end_date >= CURRENT_DATE)
         FOR UPDATE OF sc",
    )
    .bind(ids)
    .bind(shopper_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows.into_iter().collect())
}

pub(crate) async fn record_status(
    tx: &mut Transaction<'_, Postgres>,
    order_item_id: DbId,
    status_id: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO status_histories (order_item_id, status_id) VALUES ($1, $2)")
        .bind(order_item_id)
        .bind(status_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub(crate) async fn load_items(
    tx: &mut Transaction<'_, Postgres>,
    order_id: DbId,
) -> Result<Vec<OrderItem>, sqlx::Error> {
    let query = format!("SELECT {ITEM_COLUMNS} {ITEM_JOINS} WHERE oi.order_id = $1 ORDER BY oi.id");
    sqlx::query_as::<_, OrderItem>(&query)
        .bind(order_id)
        .fetch_all(&mut **tx)
        .await
}

async fn load_item(
    tx: &mut Transaction<'_, Postgres>,
    item_id: DbId,
) -> Result<OrderItem, sqlx::Error> {
    let query = format!("SELECT {ITEM_COLUMNS} {ITEM_JOINS} WHERE oi.id = $1");
    sqlx::query_as::<_, OrderItem>(&query)
        .bind(item_id)
        .fetch_one(&mut **tx)
        .await
}
