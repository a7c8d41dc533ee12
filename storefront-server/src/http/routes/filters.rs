//! Filter form options

use axum::{extract::State, routing::get, Json, Router};

use storefront_core::FilterOptions;

use crate::db::repos::{BrandRepo, CategoryRepo};
use crate::http::error::ApiError;
use crate::state::AppState;

/// GET /filters - brand, category and occasion choices for the filter form
async fn filter_options(State(state): State<AppState>) -> Result<Json<FilterOptions>, ApiError> {
    let brands = BrandRepo::new(state.pool()).list().await?;
    let categories = CategoryRepo::new(state.pool()).list().await?;

    Ok(Json(FilterOptions::new(
        brands.into_iter().map(|b| (b.id, b.name)),
        categories.into_iter().map(|c| (c.id, c.name)),
    )))
}

/// Filter option routes
pub fn router() -> Router<AppState> {
    Router::new().route("/filters", get(filter_options))
}
