//! Handlers for the read-only catalog registries.

use attier_db::models::category::MainCategoryWithSubs;
use attier_db::models::color::Color;
use attier_db::repositories::{CategoryRepo, ColorRepo};
use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<MainCategoryWithSubs>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/colors
pub async fn list_colors(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Color>>>> {
    let colors = ColorRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: colors }))
}
