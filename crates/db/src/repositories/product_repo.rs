//! Repository for products and their nested collections.
//!
//! Writes follow the reconcile pipeline: the batch is classified and
//! validated in `attier-core` against the live collection, then applied
//! inside one transaction in delete, update, create order so natural-key
//! slots vacated earlier in the batch are free for later records.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};

use attier_core::catalog::{
    validate_colors, validate_images, validate_materials, ColorPatch, ColorState, ImagePatch,
    ImageState, MaterialPatch, MaterialState, OptionPatch, OptionState,
};
use attier_core::error::CoreError;
use attier_core::pricing;
use attier_core::reconcile::record::{classify_batch, creates, delete_ids, updates, RecordOp};
use attier_core::types::DbId;

use crate::error::DbResult;
use crate::models::image::ProductImage;
use crate::models::material::ProductMaterial;
use crate::models::product::{CreateProduct, Product, ProductDetail, UpdateProduct};
use crate::models::product_color::{ProductColor, ProductColorDetail, ProductOption};

/// Column list for products queries.
const PRODUCT_COLUMNS: &str = "id, wholesaler_id, sub_category_id, name, price, sale_price, \
    base_discount_rate, base_discounted_price, manufacturing_country, on_sale, \
    created_at, updated_at";

/// Provides catalog operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// List products on sale, optionally restricted to one wholesaler.
    pub async fn list(pool: &PgPool, wholesaler_id: Option<DbId>) -> DbResult<Vec<Product>> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE on_sale AND ($1::bigint IS NULL OR wholesaler_id = $1)
             ORDER BY id"
        );
        let products = sqlx::query_as::<_, Product>(&query)
            .bind(wholesaler_id)
            .fetch_all(pool)
            .await?;
        Ok(products)
    }

    /// Fetch one product on sale with its live collections.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> DbResult<Option<ProductDetail>> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND on_sale");
        let Some(product) = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let mut tx = pool.begin().await?;
        let detail = load_detail(&mut tx, product).await?;
        tx.commit().await?;
        Ok(Some(detail))
    }

    /// Create a product together with its nested collections, atomically.
    pub async fn create(
        pool: &PgPool,
        wholesaler_id: DbId,
        input: &CreateProduct,
    ) -> DbResult<ProductDetail> {
        pricing::validate_price(input.price)?;
        let sale_price = pricing::sale_price(input.price);
        let base_discounted = pricing::base_discounted_price(sale_price, input.base_discount_rate);

        let material_ops = classify_batch(input.materials.clone());
        let image_ops = classify_batch(input.images.clone());
        let color_ops = classify_batch(input.colors.clone());

        let mut tx = pool.begin().await?;

        let registry = load_registry(&mut tx, &color_ops).await?;
        validate_materials(&[], &material_ops)?;
        validate_images(&[], &image_ops)?;
        validate_colors(&[], &color_ops, &registry)?;

        let query = format!(
            "INSERT INTO products
                (wholesaler_id, sub_category_id, name, price, sale_price,
                 base_discount_rate, base_discounted_price, manufacturing_country)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(wholesaler_id)
            .bind(input.sub_category_id)
            .bind(&input.name)
            .bind(input.price)
            .bind(sale_price)
            .bind(input.base_discount_rate)
            .bind(base_discounted)
            .bind(&input.manufacturing_country)
            .fetch_one(&mut *tx)
            .await?;

        apply_materials(&mut tx, product.id, &material_ops).await?;
        apply_images(&mut tx, product.id, &image_ops).await?;
        apply_colors(&mut tx, product.id, &color_ops, &registry).await?;

        let detail = load_detail(&mut tx, product).await?;
        tx.commit().await?;
        Ok(detail)
    }

    /// Partially update a product; present collections are reconciled
    /// against their live state. Rejections leave the product untouched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        wholesaler_id: DbId,
        input: &UpdateProduct,
    ) -> DbResult<ProductDetail> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE id = $1 AND wholesaler_id = $2 AND on_sale
             FOR UPDATE"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(wholesaler_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound { entity: "product", id })?;

        let price = input.price.unwrap_or(product.price);
        let rate = input.base_discount_rate.unwrap_or(product.base_discount_rate);
        if input.price.is_some() {
            pricing::validate_price(price)?;
        }
        let sale_price = pricing::sale_price(price);
        let base_discounted = pricing::base_discounted_price(sale_price, rate);

        if let Some(patches) = &input.materials {
            let ops = classify_batch(patches.clone());
            let live = load_materials(&mut tx, id).await?;
            validate_materials(&live, &ops)?;
            apply_materials(&mut tx, id, &ops).await?;
        }

        if let Some(patches) = &input.images {
            let ops = classify_batch(patches.clone());
            let live = load_images(&mut tx, id).await?;
            validate_images(&live, &ops)?;
            apply_images(&mut tx, id, &ops).await?;
        }

        if let Some(patches) = &input.colors {
            let ops = classify_batch(patches.clone());
            let registry = load_registry(&mut tx, &ops).await?;
            let live = load_colors(&mut tx, id).await?;
            validate_colors(&live, &ops, &registry)?;
            apply_colors(&mut tx, id, &ops, &registry).await?;
        }

        let query = format!(
            "UPDATE products SET
                sub_category_id = COALESCE($2, sub_category_id),
                name = COALESCE($3, name),
                manufacturing_country = COALESCE($4, manufacturing_country),
                price = $5, sale_price = $6, base_discount_rate = $7,
                base_discounted_price = $8, updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(input.sub_category_id)
            .bind(&input.name)
            .bind(&input.manufacturing_country)
            .bind(price)
            .bind(sale_price)
            .bind(rate)
            .bind(base_discounted)
            .fetch_one(&mut *tx)
            .await?;

        let detail = load_detail(&mut tx, product).await?;
        tx.commit().await?;
        Ok(detail)
    }

    /// Take a product off sale, deactivating its colors and options.
    pub async fn soft_delete(pool: &PgPool, id: DbId, wholesaler_id: DbId) -> DbResult<()> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE products SET on_sale = FALSE, updated_at = now()
             WHERE id = $1 AND wholesaler_id = $2 AND on_sale",
        )
        .bind(id)
        .bind(wholesaler_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(CoreError::NotFound { entity: "product", id }.into());
        }

        sqlx::query(
            "UPDATE options SET on_sale = FALSE
             WHERE product_color_id IN (SELECT id FROM product_colors WHERE product_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("UPDATE product_colors SET on_sale = FALSE WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Collection loading
// ---------------------------------------------------------------------------

async fn load_materials(
    tx: &mut Transaction<'_, Postgres>,
    product_id: DbId,
) -> Result<Vec<MaterialState>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProductMaterial>(
        "SELECT id, product_id, material, mixing_rate FROM product_materials
         WHERE product_id = $1 ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows
        .into_iter()
        .map(|m| MaterialState {
            id: m.id,
            material: m.material,
            mixing_rate: m.mixing_rate,
        })
        .collect())
}

async fn load_images(
    tx: &mut Transaction<'_, Postgres>,
    product_id: DbId,
) -> Result<Vec<ImageState>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProductImage>(
        "SELECT id, product_id, image_url, sequence FROM product_images
         WHERE product_id = $1 ORDER BY sequence",
    )
    .bind(product_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows
        .into_iter()
        .map(|i| ImageState {
            id: i.id,
            image_url: i.image_url,
            sequence: i.sequence,
        })
        .collect())
}

async fn load_colors(
    tx: &mut Transaction<'_, Postgres>,
    product_id: DbId,
) -> Result<Vec<ColorState>, sqlx::Error> {
    let colors = sqlx::query_as::<_, ProductColor>(
        "SELECT id, product_id, color_id, display_color_name, image_url, on_sale
         FROM product_colors WHERE product_id = $1 AND on_sale ORDER BY id",
    )
    .bind(product_id)
    .fetch_all(&mut **tx)
    .await?;

    let mut states = Vec::with_capacity(colors.len());
    for color in colors {
        let options = sqlx::query_as::<_, ProductOption>(
            "SELECT id, product_color_id, size, on_sale FROM options
             WHERE product_color_id = $1 AND on_sale ORDER BY id",
        )
        .bind(color.id)
        .fetch_all(&mut **tx)
        .await?;

        states.push(ColorState {
            id: color.id,
            color: color.color_id,
            display_color_name: color.display_color_name,
            options: options
                .into_iter()
                .map(|o| OptionState {
                    id: o.id,
                    size: o.size,
                })
                .collect(),
        });
    }
    Ok(states)
}

/// Registry color names for every registry id the batch references.
async fn load_registry(
    tx: &mut Transaction<'_, Postgres>,
    ops: &[RecordOp<ColorPatch>],
) -> Result<HashMap<DbId, String>, sqlx::Error> {
    let ids: Vec<DbId> = ops
        .iter()
        .filter_map(|op| match op {
            RecordOp::Create(p) | RecordOp::Update { patch: p, .. } => p.color,
            RecordOp::Delete { .. } => None,
        })
        .collect();

    let rows: Vec<(DbId, String)> =
        sqlx::query_as("SELECT id, name FROM colors WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut **tx)
            .await?;
    Ok(rows.into_iter().collect())
}

// ---------------------------------------------------------------------------
// Apply phases (deletes, then updates, then creates)
// ---------------------------------------------------------------------------

async fn apply_materials(
    tx: &mut Transaction<'_, Postgres>,
    product_id: DbId,
    ops: &[RecordOp<MaterialPatch>],
) -> Result<(), sqlx::Error> {
    for id in delete_ids(ops) {
        sqlx::query("DELETE FROM product_materials WHERE id = $1 AND product_id = $2")
            .bind(id)
            .bind(product_id)
            .execute(&mut **tx)
            .await?;
    }
    for (id, patch) in updates(ops) {
        sqlx::query(
            "UPDATE product_materials SET
                material = COALESCE($3, material),
                mixing_rate = COALESCE($4, mixing_rate)
             WHERE id = $1 AND product_id = $2",
        )
        .bind(id)
        .bind(product_id)
        .bind(&patch.material)
        .bind(patch.mixing_rate)
        .execute(&mut **tx)
        .await?;
    }
    for patch in creates(ops) {
        sqlx::query(
            "INSERT INTO product_materials (product_id, material, mixing_rate)
             VALUES ($1, $2, $3)",
        )
        .bind(product_id)
        .bind(&patch.material)
        .bind(patch.mixing_rate)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn apply_images(
    tx: &mut Transaction<'_, Postgres>,
    product_id: DbId,
    ops: &[RecordOp<ImagePatch>],
) -> Result<(), sqlx::Error> {
    for id in delete_ids(ops) {
        sqlx::query("DELETE FROM product_images WHERE id = $1 AND product_id = $2")
            .bind(id)
            .bind(product_id)
            .execute(&mut **tx)
            .await?;
    }
    for (id, patch) in updates(ops) {
        sqlx::query(
            "UPDATE product_images SET sequence = COALESCE($3, sequence)
             WHERE id = $1 AND product_id = $2",
        )
        .bind(id)
        .bind(product_id)
        .bind(patch.sequence)
        .execute(&mut **tx)
        .await?;
    }
    for patch in creates(ops) {
        sqlx::query(
            "INSERT INTO product_images (product_id, image_url, sequence)
             VALUES ($1, $2, $3)",
        )
        .bind(product_id)
        .bind(&patch.image_url)
        .bind(patch.sequence)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn apply_colors(
    tx: &mut Transaction<'_, Postgres>,
    product_id: DbId,
    ops: &[RecordOp<ColorPatch>],
    registry: &HashMap<DbId, String>,
) -> Result<(), sqlx::Error> {
    for id in delete_ids(ops) {
        deactivate_color(tx, product_id, id).await?;
    }
    for (id, patch) in updates(ops) {
        sqlx::query(
            "UPDATE product_colors SET
                display_color_name = COALESCE($3, display_color_name),
                image_url = COALESCE($4, image_url)
             WHERE id = $1 AND product_id = $2",
        )
        .bind(id)
        .bind(product_id)
        .bind(&patch.display_color_name)
        .bind(&patch.image_url)
        .execute(&mut **tx)
        .await?;

        if let Some(options) = &patch.options {
            apply_options(tx, id, &classify_batch(options.clone())).await?;
        }
    }
    for patch in creates(ops) {
        let display_name = patch
            .effective_display_name(registry)
            .unwrap_or_default();
        let color_id: (DbId,) = sqlx::query_as(
            "INSERT INTO product_colors (product_id, color_id, display_color_name, image_url)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(product_id)
        .bind(patch.color)
        .bind(&display_name)
        .bind(&patch.image_url)
        .fetch_one(&mut **tx)
        .await?;

        if let Some(options) = &patch.options {
            apply_options(tx, color_id.0, &classify_batch(options.clone())).await?;
        }
    }
    Ok(())
}

async fn apply_options(
    tx: &mut Transaction<'_, Postgres>,
    product_color_id: DbId,
    ops: &[RecordOp<OptionPatch>],
) -> Result<(), sqlx::Error> {
    for id in delete_ids(ops) {
        sqlx::query("UPDATE options SET on_sale = FALSE WHERE id = $1 AND product_color_id = $2")
            .bind(id)
            .bind(product_color_id)
            .execute(&mut **tx)
            .await?;
    }
    // Size is immutable, so update records have nothing left to persist.
    for patch in creates(ops) {
        sqlx::query("INSERT INTO options (product_color_id, size) VALUES ($1, $2)")
            .bind(product_color_id)
            .bind(&patch.size)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Deactivate one product color and its options.
async fn deactivate_color(
    tx: &mut Transaction<'_, Postgres>,
    product_id: DbId,
    color_id: DbId,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE options SET on_sale = FALSE WHERE product_color_id = $1")
        .bind(color_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("UPDATE product_colors SET on_sale = FALSE WHERE id = $1 AND product_id = $2")
        .bind(color_id)
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Detail assembly
// ---------------------------------------------------------------------------

async fn load_detail(
    tx: &mut Transaction<'_, Postgres>,
    product: Product,
) -> Result<ProductDetail, sqlx::Error> {
    let materials = sqlx::query_as::<_, ProductMaterial>(
        "SELECT id, product_id, material, mixing_rate FROM product_materials
         WHERE product_id = $1 ORDER BY id",
    )
    .bind(product.id)
    .fetch_all(&mut **tx)
    .await?;

    let images = sqlx::query_as::<_, ProductImage>(
        "SELECT id, product_id, image_url, sequence FROM product_images
         WHERE product_id = $1 ORDER BY sequence",
    )
    .bind(product.id)
    .fetch_all(&mut **tx)
    .await?;

    let colors = sqlx::query_as::<_, ProductColor>(
        "SELECT id, product_id, color_id, display_color_name, image_url, on_sale
         FROM product_colors WHERE product_id = $1 AND on_sale ORDER BY id",
    )
    .bind(product.id)
    .fetch_all(&mut **tx)
    .await?;

    let mut color_details = Vec::with_capacity(colors.len());
    for color in colors {
        let options = sqlx::query_as::<_, ProductOption>(
            "SELECT id, product_color_id, size, on_sale FROM options
             WHERE product_color_id = $1 AND on_sale ORDER BY id",
        )
        .bind(color.id)
        .fetch_all(&mut **tx)
        .await?;

        color_details.push(ProductColorDetail {
            id: color.id,
            color_id: color.color_id,
            display_color_name: color.display_color_name,
            image_url: color.image_url,
            options,
        });
    }

    Ok(ProductDetail {
        product,
        materials,
        images,
        colors: color_details,
    })
}
