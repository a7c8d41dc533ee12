//! Brand endpoints

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;

use storefront_core::{filter::parse_ids, keys};

use crate::db::repos::{Brand, BrandRepo};
use crate::http::error::ApiError;
use crate::http::extractors::CatalogQuery;
use crate::models::CatalogName;
use crate::state::AppState;

/// Create brand request
#[derive(Deserialize)]
pub struct CreateBrandRequest {
    pub name: String,
}

/// GET /brands - options for the brand select
async fn list_brands(State(state): State<AppState>) -> Result<Json<Vec<Brand>>, ApiError> {
    let brands = BrandRepo::new(state.pool()).list().await?;
    Ok(Json(brands))
}

/// POST /brands - create (or fetch) a brand by name
async fn create_brand(
    State(state): State<AppState>,
    Json(req): Json<CreateBrandRequest>,
) -> Result<(StatusCode, Json<Brand>), ApiError> {
    let name = CatalogName::new(&req.name)?;
    let brand = BrandRepo::new(state.pool()).create(&name).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

/// GET /brands/names?brandId=1,4 - id to name map; unknown ids map to null
async fn brand_names(
    State(state): State<AppState>,
    CatalogQuery(params): CatalogQuery,
) -> Result<Json<BTreeMap<i64, Option<String>>>, ApiError> {
    let ids = parse_ids(&params, keys::BRAND_ID)?;
    let names = BrandRepo::new(state.pool()).names_by_ids(&ids).await?;
    Ok(Json(names))
}

/// Brand routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/brands", get(list_brands).post(create_brand))
        .route("/brands/names", get(brand_names))
}
