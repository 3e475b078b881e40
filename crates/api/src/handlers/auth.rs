//! Handlers for the `/auth` resource.

use attier_core::error::CoreError;
use attier_core::types::DbId;
use attier_db::repositories::{ShopperRepo, WholesalerRepo};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::auth::{USER_TYPE_SHOPPER, USER_TYPE_WHOLESALER};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// `"shopper"` or `"wholesaler"`.
    pub user_type: String,
    pub username: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public account info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub user_type: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with user type + username + password. Returns an access
/// token carrying the account kind in the `user_type` claim.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let (id, username, password_hash) = match input.user_type.as_str() {
        USER_TYPE_SHOPPER => {
            let shopper = ShopperRepo::find_by_username(&state.pool, &input.username)
                .await?
                .ok_or_else(invalid_credentials)?;
            (shopper.id, shopper.username, shopper.password_hash)
        }
        USER_TYPE_WHOLESALER => {
            let wholesaler = WholesalerRepo::find_by_username(&state.pool, &input.username)
                .await?
                .ok_or_else(invalid_credentials)?;
            (wholesaler.id, wholesaler.username, wholesaler.password_hash)
        }
        other => {
            return Err(AppError::BadRequest(format!(
                "user_type must be 'shopper' or 'wholesaler', got '{other}'"
            )));
        }
    };

    let password_valid = verify_password(&input.password, &password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    let access_token = generate_access_token(id, &input.user_type, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserInfo {
            id,
            username,
            user_type: input.user_type,
        },
    }))
}

/// The same rejection for a missing account and a wrong password, so the
/// endpoint does not leak which usernames exist.
fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}
