pub mod auth;
pub mod catalog;
pub mod coupons;
pub mod deliveries;
pub mod health;
pub mod orders;
pub mod products;
pub mod shoppers;
pub mod wholesalers;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
///
/// /categories                          category tree (GET)
/// /colors                              color registry (GET)
/// /coupons                             issuable coupons (GET)
///
/// /products                            list (GET), create (POST, wholesaler)
/// /products/{id}                       detail (GET), reconcile update
///                                      (PATCH, wholesaler), soft delete
///                                      (DELETE, wholesaler)
///
/// /shoppers                            register (POST, public)
/// /shoppers/me                         profile (GET, PATCH)
/// /shoppers/me/addresses               list, save (GET, POST)
/// /shoppers/me/addresses/{id}          remove (DELETE)
/// /shoppers/me/points                  point ledger (GET)
/// /shoppers/me/coupons                 held coupons (GET), issue (POST)
///
/// /wholesalers                         register (POST, public)
///
/// /orders                              place (POST), list (GET)
/// /orders/{id}                         detail (GET)
/// /orders/{id}/shipping-address        replace address (PUT)
/// /orders/{order_id}/items/{item_id}   change option (PATCH)
///
/// /deliveries                          batch registration (POST, wholesaler)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (login).
        .nest("/auth", auth::router())
        // Read-only catalog registries.
        .nest("/categories", catalog::categories_router())
        .nest("/colors", catalog::colors_router())
        // Issuable coupons.
        .nest("/coupons", coupons::router())
        // Products and their nested collections.
        .nest("/products", products::router())
        // Shopper registration, profile, addresses, points, coupons.
        .nest("/shoppers", shoppers::router())
        // Wholesaler registration.
        .nest("/wholesalers", wholesalers::router())
        // Orders and order items.
        .nest("/orders", orders::router())
        // Delivery batch registration.
        .nest("/deliveries", deliveries::router())
}
