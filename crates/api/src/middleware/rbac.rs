//! Account-kind extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose `user_type`
//! claim does not match. Use these in route handlers to enforce the account
//! kind at the type level.

use attier_core::error::CoreError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::auth::{USER_TYPE_SHOPPER, USER_TYPE_WHOLESALER};
use crate::error::AppError;
use crate::state::AppState;

/// Requires a shopper account. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn shopper_only(RequireShopper(user): RequireShopper) -> AppResult<Json<()>> {
///     // user is guaranteed to be a shopper here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireShopper(pub AuthUser);

impl FromRequestParts<AppState> for RequireShopper {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.user_type != USER_TYPE_SHOPPER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Shopper account required".into(),
            )));
        }
        Ok(RequireShopper(user))
    }
}

/// Requires a wholesaler account. Rejects with 403 Forbidden otherwise.
pub struct RequireWholesaler(pub AuthUser);

impl FromRequestParts<AppState> for RequireWholesaler {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.user_type != USER_TYPE_WHOLESALER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Wholesaler account required".into(),
            )));
        }
        Ok(RequireWholesaler(user))
    }
}
