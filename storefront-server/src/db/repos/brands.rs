//! Brand repository
//!
//! Brands are referenced from products through the denormalised `brands`
//! column, so name lookups go by id list rather than a join.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use storefront_core::CatalogName;

use super::DbError;

/// Brand record from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Brand repository
pub struct BrandRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> BrandRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a brand, returning the existing row on name conflict.
    pub async fn create(&self, name: &CatalogName) -> Result<Brand, DbError> {
        let brand = sqlx::query_as::<_, Brand>(
            r#"
            INSERT INTO brands (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, created_at
            "#,
        )
        .bind(name.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(brand)
    }

    /// All brands ordered by name, for the brand select.
    pub async fn list(&self) -> Result<Vec<Brand>, DbError> {
        let brands = sqlx::query_as::<_, Brand>(
            "SELECT id, name, created_at FROM brands ORDER BY name, id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(brands)
    }

    /// Map each requested id to its brand name; unknown ids map to `None`.
    ///
    /// One `= ANY` query regardless of how many ids are asked for.
    pub async fn names_by_ids(&self, ids: &[i64]) -> Result<BTreeMap<i64, Option<String>>, DbError> {
        let mut names: BTreeMap<i64, Option<String>> = ids.iter().map(|id| (*id, None)).collect();
        if ids.is_empty() {
            return Ok(names);
        }

        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM brands WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(self.pool)
                .await?;

        for (id, name) in rows {
            names.insert(id, Some(name));
        }
        Ok(names)
    }
}
