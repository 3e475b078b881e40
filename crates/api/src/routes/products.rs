use axum::routing::get;
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create (wholesaler)
/// GET    /{id}  -> get_detail
/// PATCH  /{id}  -> update (wholesaler)
/// DELETE /{id}  -> delete (wholesaler)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::get_detail)
                .patch(products::update)
                .delete(products::delete),
        )
}
