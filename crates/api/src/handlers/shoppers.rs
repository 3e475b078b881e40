//! Handlers for shopper registration, profile and saved addresses.

use attier_core::error::CoreError;
use attier_core::types::DbId;
use attier_db::models::shopper::{
    CreateShopper, CreateShippingAddress, PointHistory, Shopper, ShippingAddress, UpdateShopper,
};
use attier_db::repositories::{ShippingAddressRepo, ShopperRepo};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireShopper;
use crate::response::DataResponse;
use crate::state::AppState;

/// Minimum password length for registrations.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Request body for `POST /shoppers`.
#[derive(Debug, Deserialize)]
pub struct RegisterShopperRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    /// Optional; a placeholder nickname is generated when absent.
    pub nickname: Option<String>,
    pub mobile_number: String,
}

/// POST /api/v1/shoppers
///
/// Register a shopper on the basic membership. A duplicate username,
/// nickname or mobile number surfaces as 409.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterShopperRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Shopper>>)> {
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let shopper = ShopperRepo::create(
        &state.pool,
        &CreateShopper {
            username: input.username,
            password_hash,
            name: input.name,
            nickname: input.nickname,
            mobile_number: input.mobile_number,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: shopper })))
}

/// GET /api/v1/shoppers/me
pub async fn me(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
) -> AppResult<Json<DataResponse<Shopper>>> {
    let shopper = ShopperRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "shopper",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse { data: shopper }))
}

/// PATCH /api/v1/shoppers/me
pub async fn update_me(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    Json(input): Json<UpdateShopper>,
) -> AppResult<Json<DataResponse<Shopper>>> {
    let shopper = ShopperRepo::update(&state.pool, user.user_id, &input).await?;
    Ok(Json(DataResponse { data: shopper }))
}

/// GET /api/v1/shoppers/me/addresses
pub async fn list_addresses(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
) -> AppResult<Json<DataResponse<Vec<ShippingAddress>>>> {
    let addresses = ShippingAddressRepo::list(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: addresses }))
}

/// POST /api/v1/shoppers/me/addresses
pub async fn create_address(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    Json(input): Json<CreateShippingAddress>,
) -> AppResult<(StatusCode, Json<DataResponse<ShippingAddress>>)> {
    let address = ShippingAddressRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: address })))
}

/// DELETE /api/v1/shoppers/me/addresses/{id}
pub async fn delete_address(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ShippingAddressRepo::delete(&state.pool, user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/shoppers/me/points
pub async fn point_histories(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
) -> AppResult<Json<DataResponse<Vec<PointHistory>>>> {
    let histories = ShopperRepo::point_histories(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: histories }))
}
