//! Handlers for the `/orders` resource.
//!
//! Order creation re-validates the client-computed price breakdown and
//! distributes used and earned points over the lines; everything is written
//! in one transaction by `OrderRepo`.

use attier_core::error::CoreError;
use attier_core::types::DbId;
use attier_db::models::order::{
    ChangeOption, CreateOrder, Order, OrderDetail, OrderItem, ShippingAddressPayload,
};
use attier_db::repositories::OrderRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireShopper;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/orders
pub async fn create(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    Json(input): Json<CreateOrder>,
) -> AppResult<(StatusCode, Json<DataResponse<OrderDetail>>)> {
    let detail = OrderRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/orders
pub async fn list(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
) -> AppResult<Json<DataResponse<Vec<OrderDetail>>>> {
    let orders = OrderRepo::list_for_shopper(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/v1/orders/{id}
pub async fn get_detail(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OrderDetail>>> {
    let detail = OrderRepo::find_detail(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "order", id }))?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/orders/{id}/shipping-address
pub async fn update_shipping_address(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    Path(id): Path<DbId>,
    Json(input): Json<ShippingAddressPayload>,
) -> AppResult<Json<DataResponse<Order>>> {
    let order = OrderRepo::update_shipping_address(&state.pool, id, user.user_id, &input).await?;
    Ok(Json(DataResponse { data: order }))
}

/// PATCH /api/v1/orders/{order_id}/items/{item_id}
///
/// Swap the item's option; only allowed before delivery starts and within
/// the same product.
pub async fn change_option(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    Path((order_id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<ChangeOption>,
) -> AppResult<Json<DataResponse<OrderItem>>> {
    let item =
        OrderRepo::change_option(&state.pool, order_id, item_id, user.user_id, &input).await?;
    Ok(Json(DataResponse { data: item }))
}
