//! Handlers for wholesaler registration.

use attier_db::models::wholesaler::{CreateWholesaler, Wholesaler};
use attier_db::repositories::WholesalerRepo;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Minimum password length for registrations.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Request body for `POST /wholesalers`.
#[derive(Debug, Deserialize)]
pub struct RegisterWholesalerRequest {
    pub username: String,
    pub password: String,
    pub company_name: String,
}

/// POST /api/v1/wholesalers
///
/// Register a wholesaler account. A duplicate username surfaces as 409.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterWholesalerRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Wholesaler>>)> {
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let wholesaler = WholesalerRepo::create(
        &state.pool,
        &CreateWholesaler {
            username: input.username,
            password_hash,
            company_name: input.company_name,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: wholesaler })))
}
