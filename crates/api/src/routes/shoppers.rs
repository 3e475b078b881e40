use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{coupons, shoppers};
use crate::state::AppState;

/// Routes mounted at `/shoppers`.
///
/// ```text
/// POST   /                    -> register (public)
/// GET    /me                  -> me
/// PATCH  /me                  -> update_me
/// GET    /me/addresses        -> list_addresses
/// POST   /me/addresses        -> create_address
/// DELETE /me/addresses/{id}   -> delete_address
/// GET    /me/points           -> point_histories
/// GET    /me/coupons          -> list held coupons
/// POST   /me/coupons          -> issue coupon
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(shoppers::register))
        .route("/me", get(shoppers::me).patch(shoppers::update_me))
        .route(
            "/me/addresses",
            get(shoppers::list_addresses).post(shoppers::create_address),
        )
        .route("/me/addresses/{id}", delete(shoppers::delete_address))
        .route("/me/points", get(shoppers::point_histories))
        .route(
            "/me/coupons",
            get(coupons::list_mine).post(coupons::issue),
        )
}
