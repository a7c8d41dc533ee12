//! Category repository
//!
//! Categories are linked to products through the normalised
//! `product_categories` join table.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Row};

use storefront_core::CatalogName;

use super::DbError;

/// Category record from database
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Category repository
pub struct CategoryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a category, returning the existing row on name conflict.
    pub async fn create(&self, name: &CatalogName) -> Result<Category, DbError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, created_at
            "#,
        )
        .bind(name.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(category)
    }

    /// All categories ordered by name, for the category select.
    pub async fn list(&self) -> Result<Vec<Category>, DbError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name, created_at FROM categories ORDER BY name, id")
                .fetch_all(self.pool)
                .await?;

        Ok(categories)
    }

    /// Categories of one product (`getProductCategories`).
    pub async fn for_product(&self, product_id: i64) -> Result<Vec<Category>, DbError> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name, c.created_at
            FROM product_categories pc
            INNER JOIN categories c ON c.id = pc.category_id
            WHERE pc.product_id = $1
            ORDER BY c.name, c.id
            "#,
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Category ids currently stored for a product.
    pub async fn ids_for_product(&self, product_id: i64) -> Result<Vec<i64>, DbError> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT category_id FROM product_categories WHERE product_id = $1 ORDER BY category_id",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(ids)
    }

    /// Category names for every listed product (`getAllProductCategories`).
    ///
    /// Every requested id gets an entry, empty when uncategorised. One joined
    /// query instead of one per product.
    pub async fn names_for_products(
        &self,
        product_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<String>>, DbError> {
        let mut names: HashMap<i64, Vec<String>> =
            product_ids.iter().map(|id| (*id, Vec::new())).collect();
        if product_ids.is_empty() {
            return Ok(names);
        }

        let rows = sqlx::query(
            r#"
            SELECT pc.product_id, c.name
            FROM product_categories pc
            INNER JOIN categories c ON c.id = pc.category_id
            WHERE pc.product_id = ANY($1)
            ORDER BY pc.product_id, c.name
            "#,
        )
        .bind(product_ids)
        .fetch_all(self.pool)
        .await?;

        for row in rows {
            let product_id: i64 = row.get("product_id");
            names.entry(product_id).or_default().push(row.get("name"));
        }
        Ok(names)
    }
}
