//! Repository for delivery batch registration.
//!
//! A wholesaler registers one delivery per order; every delivery in the
//! batch shares a generated flag, and the covered order items move to
//! delivery progressing with a status history row each.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use rand::Rng;
use sqlx::PgPool;

use attier_core::error::CoreError;
use attier_core::orders::{status, validate_deliveries, DeliveryRequest};
use attier_core::types::DbId;

use crate::error::DbResult;
use crate::models::delivery::Delivery;
use crate::repositories::order_repo::record_status;

/// Column list for deliveries queries.
const COLUMNS: &str = "id, company, invoice_number, flag, created_at";

/// Provides delivery registration for wholesalers.
pub struct DeliveryRepo;

impl DeliveryRepo {
    /// Register a batch of deliveries atomically.
    pub async fn register(pool: &PgPool, batch: &[DeliveryRequest]) -> DbResult<Vec<Delivery>> {
        let mut tx = pool.begin().await?;

        // Load the live items of every referenced order so existence and
        // prior-delivery checks run against current state.
        let mut delivered: HashSet<DbId> = HashSet::new();
        for request in batch {
            let rows: Vec<(DbId, Option<DbId>)> = sqlx::query_as(
                "SELECT id, delivery_id FROM order_items WHERE order_id = $1 FOR UPDATE",
            )
            .bind(request.order)
            .fetch_all(&mut *tx)
            .await?;
            if rows.is_empty() {
                return Err(CoreError::NotFound { entity: "order", id: request.order }.into());
            }

            let by_id: HashMap<DbId, Option<DbId>> = rows.into_iter().collect();
            for item in &request.order_items {
                match by_id.get(item) {
                    None => {
                        return Err(CoreError::validation(
                            "deliveries",
                            format!("order_item {item} does not exist."),
                        )
                        .into());
                    }
                    Some(Some(_)) => {
                        delivered.insert(*item);
                    }
                    Some(None) => {}
                }
            }
        }

        let mut registered: HashSet<(String, String)> = HashSet::new();
        for request in batch {
            let exists: Option<(DbId,)> = sqlx::query_as(
                "SELECT id FROM deliveries WHERE company = $1 AND invoice_number = $2",
            )
            .bind(&request.company)
            .bind(&request.invoice_number)
            .fetch_optional(&mut *tx)
            .await?;
            if exists.is_some() {
                registered.insert((request.company.clone(), request.invoice_number.clone()));
            }
        }

        validate_deliveries(batch, &registered, &delivered)?;

        let flag = batch_flag();
        let mut deliveries = Vec::with_capacity(batch.len());
        for request in batch {
            let query = format!(
                "INSERT INTO deliveries (company, invoice_number, flag)
                 VALUES ($1, $2, $3)
                 RETURNING {COLUMNS}"
            );
            let delivery = sqlx::query_as::<_, Delivery>(&query)
                .bind(&request.company)
                .bind(&request.invoice_number)
                .bind(&flag)
                .fetch_one(&mut *tx)
                .await?;

            for item in &request.order_items {
                sqlx::query(
                    "UPDATE order_items SET delivery_id = $2, status_id = $3 WHERE id = $1",
                )
                .bind(item)
                .bind(delivery.id)
                .bind(status::DELIVERY_PROGRESSING)
                .execute(&mut *tx)
                .await?;
                record_status(&mut tx, *item, status::DELIVERY_PROGRESSING).await?;
            }

            deliveries.push(delivery);
        }

        tx.commit().await?;
        Ok(deliveries)
    }
}

/// Shared batch flag: `%Y%m%d%H%M%S` prefix plus a random suffix.
fn batch_flag() -> String {
    let suffix: u32 = rand::rng().random_range(0..100_000);
    format!("{}{suffix:05}", Utc::now().format("%Y%m%d%H%M%S"))
}
