//! Router tests that never reach the database.
//!
//! The pool connects lazily, so every request here must be answered before
//! a connection is needed: health, input validation and cached listings.
//! Requests that do fall through to the pool fail fast with a 500.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use storefront_server::http::{build_router, ServerConfig};
use storefront_server::AppState;

fn app() -> (AppState, Router) {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://storefront@localhost:1/unused")
        .unwrap();
    let state = AppState::new(pool);
    let router = build_router(state.clone(), &ServerConfig::default()).unwrap();
    (state, router)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint() {
    let (_, app) = app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn unknown_sort_column_is_rejected() {
    let (_, app) = app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/products?sortBy=password-desc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "validation_error");
}

#[tokio::test]
async fn malformed_discount_is_rejected() {
    let (_, app) = app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/products?discount=10-6")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_product_id_is_rejected() {
    let (_, app) = app();

    for method in ["GET", "DELETE"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/products/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method}");
    }
}

#[tokio::test]
async fn invalid_product_payload_is_rejected() {
    let (_, app) = app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/products")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"product": {"name": "Runner", "price": 10.0, "discount": 150}}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn matching_etag_answers_not_modified() {
    let (state, app) = app();
    let etag = state.revalidator().etag("/products", "gender=women&page=2");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/products?gender=women&page=2")
                .header(header::IF_NONE_MATCH, &etag)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(response.headers()[header::ETAG], etag.as_str());
}

#[tokio::test]
async fn revalidation_invalidates_etag() {
    let (state, app) = app();
    let stale = state.revalidator().etag("/products", "");
    state.revalidator().revalidate_path("/products");

    let fresh = state.revalidator().etag("/products", "");
    assert_ne!(stale, fresh);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/products")
                .header(header::IF_NONE_MATCH, &fresh)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn etag_from_before_restart_is_not_trusted() {
    let (before_restart, _) = app();
    let stale = before_restart.revalidator().etag("/products", "");
    before_restart.revalidator().revalidate_path("/products");

    let (_, restarted) = app();
    let response = restarted
        .oneshot(
            Request::builder()
                .uri("/products")
                .header(header::IF_NONE_MATCH, &stale)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Falls through to the (unreachable) database instead of answering 304
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
