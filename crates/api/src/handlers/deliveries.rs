//! Handlers for delivery batch registration.

use attier_core::orders::DeliveryRequest;
use attier_db::models::delivery::Delivery;
use attier_db::repositories::DeliveryRepo;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::rbac::RequireWholesaler;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/deliveries
///
/// Register a batch of deliveries. The batch is validated as a whole and
/// applied atomically; covered order items move to delivery progressing.
pub async fn register(
    State(state): State<AppState>,
    RequireWholesaler(_user): RequireWholesaler,
    Json(input): Json<Vec<DeliveryRequest>>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<Delivery>>>)> {
    let deliveries = DeliveryRepo::register(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: deliveries })))
}
