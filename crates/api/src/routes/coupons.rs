use axum::routing::get;
use axum::Router;

use crate::handlers::coupons;
use crate::state::AppState;

/// Routes mounted at `/coupons`.
///
/// Shopper-held coupon routes live under `/shoppers/me/coupons`, see
/// [`super::shoppers::router`].
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(coupons::list))
}
