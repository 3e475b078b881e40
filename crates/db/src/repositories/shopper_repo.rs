//! Repositories for shopper accounts and their saved shipping addresses.

use chrono::Utc;
use rand::Rng;
use sqlx::PgPool;

use attier_core::error::CoreError;
use attier_core::types::DbId;

use crate::error::DbResult;
use crate::models::shopper::{
    CreateShopper, CreateShippingAddress, PointHistory, Shopper, ShippingAddress, UpdateShopper,
};

/// Column list for shoppers joined with their membership.
const SHOPPER_COLUMNS: &str = "s.id, s.username, s.password_hash, s.name, s.nickname, \
    s.mobile_number, s.point, s.membership_id, m.name AS membership_name, \
    m.discount_rate AS membership_discount_rate, s.created_at";

const ADDRESS_COLUMNS: &str = "id, shopper_id, name, receiver_name, mobile_number, \
    phone_number, zip_code, base_address, detail_address, is_default";

/// Provides account operations for shoppers.
pub struct ShopperRepo;

impl ShopperRepo {
    /// Register a shopper on the basic membership. A missing nickname gets
    /// a generated placeholder the shopper can change later.
    pub async fn create(pool: &PgPool, input: &CreateShopper) -> DbResult<Shopper> {
        let nickname = match &input.nickname {
            Some(nickname) => nickname.clone(),
            None => default_nickname(),
        };

        let id: (DbId,) = sqlx::query_as(
            "INSERT INTO shoppers (username, password_hash, name, nickname, mobile_number, membership_id)
             SELECT $1, $2, $3, $4, $5, id FROM memberships WHERE name = 'basic'
             RETURNING id",
        )
        .bind(&input.username)
        .bind(&input.password_hash)
        .bind(&input.name)
        .bind(&nickname)
        .bind(&input.mobile_number)
        .fetch_one(pool)
        .await?;

        let shopper = Self::find_by_id(pool, id.0)
            .await?
            .ok_or(CoreError::NotFound { entity: "shopper", id: id.0 })?;
        Ok(shopper)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> DbResult<Option<Shopper>> {
        let query = format!(
            "SELECT {SHOPPER_COLUMNS} FROM shoppers s
             JOIN memberships m ON m.id = s.membership_id
             WHERE s.id = $1"
        );
        let shopper = sqlx::query_as::<_, Shopper>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(shopper)
    }

    pub async fn find_by_username(pool: &PgPool, username: &str) -> DbResult<Option<Shopper>> {
        let query = format!(
            "SELECT {SHOPPER_COLUMNS} FROM shoppers s
             JOIN memberships m ON m.id = s.membership_id
             WHERE s.username = $1"
        );
        let shopper = sqlx::query_as::<_, Shopper>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(shopper)
    }

    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateShopper) -> DbResult<Shopper> {
        let updated = sqlx::query(
            "UPDATE shoppers SET
                name = COALESCE($2, name),
                nickname = COALESCE($3, nickname),
                mobile_number = COALESCE($4, mobile_number),
                updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.nickname)
        .bind(&input.mobile_number)
        .execute(pool)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(CoreError::NotFound { entity: "shopper", id }.into());
        }

        let shopper = Self::find_by_id(pool, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "shopper", id })?;
        Ok(shopper)
    }

    /// Point ledger, newest first.
    pub async fn point_histories(pool: &PgPool, shopper_id: DbId) -> DbResult<Vec<PointHistory>> {
        let histories = sqlx::query_as::<_, PointHistory>(
            "SELECT id, shopper_id, order_id, point_change, content, created_at
             FROM point_histories WHERE shopper_id = $1 ORDER BY id DESC",
        )
        .bind(shopper_id)
        .fetch_all(pool)
        .await?;
        Ok(histories)
    }
}

/// `ap_<MMDDHHMM>_<n>` placeholder nickname for registrations without one.
fn default_nickname() -> String {
    let suffix: u32 = rand::rng().random_range(0..10_000);
    format!("ap_{}_{suffix}", Utc::now().format("%m%d%H%M"))
}

/// Provides operations for a shopper's saved shipping addresses.
pub struct ShippingAddressRepo;

impl ShippingAddressRepo {
    pub async fn list(pool: &PgPool, shopper_id: DbId) -> DbResult<Vec<ShippingAddress>> {
        let query = format!(
            "SELECT {ADDRESS_COLUMNS} FROM shopper_shipping_addresses
             WHERE shopper_id = $1 ORDER BY is_default DESC, id"
        );
        let addresses = sqlx::query_as::<_, ShippingAddress>(&query)
            .bind(shopper_id)
            .fetch_all(pool)
            .await?;
        Ok(addresses)
    }

    /// Save an address; marking it default clears the previous default.
    pub async fn create(
        pool: &PgPool,
        shopper_id: DbId,
        input: &CreateShippingAddress,
    ) -> DbResult<ShippingAddress> {
        let mut tx = pool.begin().await?;

        if input.is_default {
            sqlx::query(
                "UPDATE shopper_shipping_addresses SET is_default = FALSE
                 WHERE shopper_id = $1 AND is_default",
            )
            .bind(shopper_id)
            .execute(&mut *tx)
            .await?;
        }

        let query = format!(
            "INSERT INTO shopper_shipping_addresses
                (shopper_id, name, receiver_name, mobile_number, phone_number,
                 zip_code, base_address, detail_address, is_default)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {ADDRESS_COLUMNS}"
        );
        let address = sqlx::query_as::<_, ShippingAddress>(&query)
            .bind(shopper_id)
            .bind(&input.name)
            .bind(&input.receiver_name)
            .bind(&input.mobile_number)
            .bind(&input.phone_number)
            .bind(&input.zip_code)
            .bind(&input.base_address)
            .bind(&input.detail_address)
            .bind(input.is_default)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(address)
    }

    pub async fn delete(pool: &PgPool, shopper_id: DbId, id: DbId) -> DbResult<()> {
        let deleted = sqlx::query(
            "DELETE FROM shopper_shipping_addresses WHERE id = $1 AND shopper_id = $2",
        )
        .bind(id)
        .bind(shopper_id)
        .execute(pool)
        .await?;
        if deleted.rows_affected() == 0 {
            return Err(CoreError::NotFound { entity: "shipping address", id }.into());
        }
        Ok(())
    }
}
