//! Request payloads with validation at the boundary
//!
//! Listing vocabulary (filters, sort, pagination) lives in storefront-core
//! and is re-exported here.

pub mod product;

pub use product::{NewProduct, ProductChanges};
pub use storefront_core::{
    CatalogName, CategoryDiff, DiscountRange, Gender, ListingQuery, Pagination, ProductFilter,
    QueryParams, SortBy, ValidationError,
};
