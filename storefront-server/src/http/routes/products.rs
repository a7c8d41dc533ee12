//! Product endpoints
//!
//! The listing is rendered from the URL alone: every filter, the sort key and
//! the page live in the query string, parsed by [`ListingQuery`].

use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::State,
    http::{
        header::{ETAG, IF_NONE_MATCH},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use storefront_core::LISTING_PATH;

use crate::db::repos::{BrandRepo, Category, CategoryRepo, Product, ProductListing, ProductRepo};
use crate::http::error::{ApiError, PRODUCT_NOT_DELETED, PRODUCT_NOT_FOUND};
use crate::http::extractors::{CatalogQuery, ValidId};
use crate::models::{ListingQuery, NewProduct, ProductChanges};
use crate::state::AppState;

/// Save product request: the product plus the categories to link
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProductRequest {
    pub product: NewProduct,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// Update product request; omitted `categoryIds` leaves links untouched
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub product: ProductChanges,
    #[serde(default)]
    pub category_ids: Option<Vec<i64>>,
}

/// Listing page with category names per product
#[derive(Serialize)]
pub struct ListingResponse {
    #[serde(flatten)]
    pub listing: ProductListing,
    pub categories: HashMap<i64, Vec<String>>,
}

/// Single product with its categories and brand names
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub categories: Vec<Category>,
    pub brand_names: BTreeMap<i64, Option<String>>,
}

/// GET /products - filtered, sorted, paginated listing
async fn list_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    CatalogQuery(params): CatalogQuery,
) -> Result<Response, ApiError> {
    let query = ListingQuery::from_query(&params, state.default_page_size())?;

    let etag = state.revalidator().etag(LISTING_PATH, &params.to_string());
    let fresh = headers
        .get(IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| etag_matches(value, &etag));
    if fresh {
        return Ok((StatusCode::NOT_MODIFIED, [(ETAG, etag)]).into_response());
    }

    let listing = ProductRepo::new(state.pool()).list(&query).await?;
    let ids: Vec<i64> = listing.products.iter().map(|p| p.id).collect();
    let categories = CategoryRepo::new(state.pool()).names_for_products(&ids).await?;

    Ok(([(ETAG, etag)], Json(ListingResponse { listing, categories })).into_response())
}

/// POST /products - save a product with its categories
async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<SaveProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    req.product.validate()?;
    let product = ProductRepo::new(state.pool())
        .create(&req.product, &req.category_ids)
        .await?;

    state.revalidator().revalidate_path(LISTING_PATH);
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products/{id} - single product, `null` when the id is unknown
async fn get_product(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Json<Option<ProductDetail>>, ApiError> {
    let Some(product) = ProductRepo::new(state.pool())
        .find(id)
        .await
        .map_err(|e| ApiError::action(e, PRODUCT_NOT_FOUND))?
    else {
        tracing::debug!(product_id = id, "product not found");
        return Ok(Json(None));
    };

    let categories = CategoryRepo::new(state.pool())
        .for_product(id)
        .await
        .map_err(|e| ApiError::action(e, PRODUCT_NOT_FOUND))?;
    let brand_names = BrandRepo::new(state.pool())
        .names_by_ids(&product.brand_ids())
        .await
        .map_err(|e| ApiError::action(e, PRODUCT_NOT_FOUND))?;

    Ok(Json(Some(ProductDetail {
        product,
        categories,
        brand_names,
    })))
}

/// PUT /products/{id} - partial update with category reconciliation
async fn update_product(
    State(state): State<AppState>,
    ValidId(id): ValidId,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>, ApiError> {
    req.product.validate()?;
    let product = ProductRepo::new(state.pool())
        .update(id, &req.product, req.category_ids.as_deref())
        .await?;

    state.revalidator().revalidate_path(LISTING_PATH);
    Ok(Json(product))
}

/// DELETE /products/{id} - remove a product and its dependents
async fn delete_product(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Json<Value>, ApiError> {
    ProductRepo::new(state.pool())
        .delete(id)
        .await
        .map_err(|e| ApiError::action(e, PRODUCT_NOT_DELETED))?;

    state.revalidator().revalidate_path(LISTING_PATH);
    Ok(Json(json!({ "message": "success" })))
}

/// GET /products/{id}/categories - `(id, name)` pairs for one product
async fn product_categories(
    State(state): State<AppState>,
    ValidId(id): ValidId,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = CategoryRepo::new(state.pool()).for_product(id).await?;
    Ok(Json(categories))
}

/// True when an `If-None-Match` header value names `etag` (or is `*`).
fn etag_matches(header: &str, etag: &str) -> bool {
    header
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || candidate == etag)
}

/// Product routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/{id}/categories", get(product_categories))
}
