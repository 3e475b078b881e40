use axum::routing::post;
use axum::Router;

use crate::handlers::wholesalers;
use crate::state::AppState;

/// Routes mounted at `/wholesalers`.
///
/// ```text
/// POST / -> register (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(wholesalers::register))
}
