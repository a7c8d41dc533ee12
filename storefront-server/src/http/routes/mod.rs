//! Route handlers organized by resource

pub mod brands;
pub mod categories;
pub mod filters;
pub mod health;
pub mod products;
