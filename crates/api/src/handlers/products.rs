//! Handlers for the `/products` resource.
//!
//! Writes require a wholesaler account; collection updates run through the
//! reconcile pipeline in `attier-core` and are applied atomically by
//! `ProductRepo`.

use attier_core::error::CoreError;
use attier_core::types::DbId;
use attier_db::models::product::{CreateProduct, Product, ProductDetail, UpdateProduct};
use attier_db::repositories::ProductRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireWholesaler;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /products`.
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    /// Restrict the listing to one wholesaler's products.
    pub wholesaler: Option<DbId>,
}

/// GET /api/v1/products
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let products = ProductRepo::list(&state.pool, query.wholesaler).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/{id}
pub async fn get_detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProductDetail>>> {
    let detail = ProductRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "product",
            id,
        }))?;
    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/products
///
/// Creates a product together with its materials, images, colors and
/// options in one transaction.
pub async fn create(
    State(state): State<AppState>,
    RequireWholesaler(user): RequireWholesaler,
    Json(input): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<DataResponse<ProductDetail>>)> {
    let detail = ProductRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PATCH /api/v1/products/{id}
///
/// Partial update; present collections are reconciled against their live
/// state. A rejected batch leaves the product untouched.
pub async fn update(
    State(state): State<AppState>,
    RequireWholesaler(user): RequireWholesaler,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<Json<DataResponse<ProductDetail>>> {
    let detail = ProductRepo::update(&state.pool, id, user.user_id, &input).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/products/{id}
///
/// Soft delete; the product and its colors and options are taken off sale.
pub async fn delete(
    State(state): State<AppState>,
    RequireWholesaler(user): RequireWholesaler,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ProductRepo::soft_delete(&state.pool, id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
