use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/categories`.
pub fn categories_router() -> Router<AppState> {
    Router::new().route("/", get(catalog::list_categories))
}

/// Routes mounted at `/colors`.
pub fn colors_router() -> Router<AppState> {
    Router::new().route("/", get(catalog::list_colors))
}
