use axum::routing::post;
use axum::Router;

use crate::handlers::deliveries;
use crate::state::AppState;

/// Routes mounted at `/deliveries`.
///
/// ```text
/// POST / -> register (wholesaler)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(deliveries::register))
}
