//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool; cheap to construct per request
//! - Handles conflicts via ON CONFLICT (no check-then-insert)
//! - Uses transactions for multi-step operations

pub mod brands;
pub mod categories;
pub mod products;

pub use brands::{Brand, BrandRepo};
pub use categories::{Category, CategoryRepo};
pub use products::{DeletedProduct, Product, ProductListing, ProductRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}
