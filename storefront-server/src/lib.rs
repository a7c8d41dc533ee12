//! storefront-server: catalog data access and HTTP surface
//!
//! Repositories compose filtered, paginated product queries against
//! Postgres; the HTTP layer exposes them as JSON routes for the
//! server-rendered listing and the admin forms.

pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod revalidate;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use state::AppState;
