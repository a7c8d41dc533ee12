//! Category endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;

use crate::db::repos::{Category, CategoryRepo};
use crate::http::error::ApiError;
use crate::models::CatalogName;
use crate::state::AppState;

/// Create category request
#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// GET /categories - options for the category select
async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = CategoryRepo::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// POST /categories - create (or fetch) a category by name
async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = CatalogName::new(&req.name)?;
    let category = CategoryRepo::new(state.pool()).create(&name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Category routes
pub fn router() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories).post(create_category))
}
