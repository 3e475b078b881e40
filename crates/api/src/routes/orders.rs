use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Routes mounted at `/orders`.
///
/// ```text
/// POST  /                                -> create
/// GET   /                                -> list
/// GET   /{id}                            -> get_detail
/// PUT   /{id}/shipping-address           -> update_shipping_address
/// PATCH /{order_id}/items/{item_id}      -> change_option
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/{id}", get(orders::get_detail))
        .route(
            "/{id}/shipping-address",
            put(orders::update_shipping_address),
        )
        .route(
            "/{order_id}/items/{item_id}",
            patch(orders::change_option),
        )
}
