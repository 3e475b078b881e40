//! Handlers for coupon listing and issuance.

use attier_core::types::DbId;
use attier_db::models::coupon::{Coupon, ShopperCoupon};
use attier_db::repositories::CouponRepo;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireShopper;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /shoppers/me/coupons`.
#[derive(Debug, Deserialize)]
pub struct IssueCouponRequest {
    pub coupon: DbId,
}

/// GET /api/v1/coupons
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Coupon>>>> {
    let coupons = CouponRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: coupons }))
}

/// GET /api/v1/shoppers/me/coupons
pub async fn list_mine(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
) -> AppResult<Json<DataResponse<Vec<ShopperCoupon>>>> {
    let coupons = CouponRepo::list_for_shopper(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: coupons }))
}

/// POST /api/v1/shoppers/me/coupons
///
/// Issue a coupon to the calling shopper. Issuing the same coupon twice
/// hits the unique constraint and surfaces as 409.
pub async fn issue(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    Json(input): Json<IssueCouponRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ShopperCoupon>>)> {
    let coupon = CouponRepo::issue(&state.pool, user.user_id, input.coupon).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: coupon })))
}
