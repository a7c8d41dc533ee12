//! Product repository
//!
//! Handles product CRUD with:
//! - Atomic create/update together with category associations (transaction)
//! - Filtered, sorted, paginated listing built with `QueryBuilder`
//! - Cascading delete of associations, reviews and comments

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};

use storefront_core::{CategoryDiff, Gender, ListingQuery, ProductFilter};

use super::DbError;
use crate::models::product::{join_brand_ids, join_occasions};
use crate::models::{NewProduct, ProductChanges};

const PRODUCT_COLUMNS: &str = "products.id, products.name, products.description, products.price, \
     products.rating, products.image_url, products.gender, products.occasion, products.discount, \
     products.brands, products.created_at, products.updated_at";

/// Product record from database
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub rating: f64,
    pub image_url: Option<String>,
    /// Empty when the product has no gender
    pub gender: String,
    /// Comma-delimited occasion tokens
    pub occasion: String,
    pub discount: i32,
    /// Comma-delimited brand ids
    pub brands: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Brand ids parsed back out of the `brands` column.
    pub fn brand_ids(&self) -> Vec<i64> {
        self.brands
            .split(',')
            .filter_map(|id| id.trim().parse().ok())
            .collect()
    }
}

/// One page of a product listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub products: Vec<Product>,
    /// Total matches across all pages
    pub count: i64,
    pub last_page: u32,
    pub num_of_results_on_cur_page: usize,
}

/// Rows removed alongside a product
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeletedProduct {
    pub categories: u64,
    pub reviews: u64,
    pub comments: u64,
}

/// Product repository
pub struct ProductRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product and link it to `category_ids` (`saveProducts`).
    ///
    /// Runs in one transaction; an unknown category id rolls back the
    /// product insert as well.
    pub async fn create(&self, product: &NewProduct, category_ids: &[i64]) -> Result<Product, DbError> {
        let mut tx = self.pool.begin().await?;

        let created: Product = sqlx::query_as(&format!(
            r#"
            INSERT INTO products
                (name, description, price, rating, image_url, gender, occasion, discount, brands)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.name.as_str())
        .bind(product.description.as_deref())
        .bind(product.price)
        .bind(product.rating)
        .bind(product.image_url.as_deref())
        .bind(Gender::column_value(product.gender))
        .bind(product.occasion_column())
        .bind(product.discount)
        .bind(product.brands_column())
        .fetch_one(&mut *tx)
        .await?;

        let links = CategoryDiff::compute(category_ids, &[]);
        insert_categories(&mut *tx, created.id, &links.to_insert).await?;

        tx.commit().await?;
        info!(product_id = created.id, categories = links.to_insert.len(), "product saved");
        Ok(created)
    }

    /// Apply `changes` and reconcile category links (`updateProduct`).
    ///
    /// Only fields present in `changes` are written. With `category_ids` set,
    /// links are reconciled by set difference: stale links are deleted and
    /// missing ones inserted, untouched links stay.
    pub async fn update(
        &self,
        id: i64,
        changes: &ProductChanges,
        category_ids: Option<&[i64]>,
    ) -> Result<Product, DbError> {
        let mut tx = self.pool.begin().await?;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE products SET ");
        {
            let mut set = builder.separated(", ");
            if let Some(name) = &changes.name {
                set.push("name = ").push_bind_unseparated(name.as_str().to_owned());
            }
            if let Some(description) = &changes.description {
                set.push("description = ").push_bind_unseparated(description.clone());
            }
            if let Some(price) = changes.price {
                set.push("price = ").push_bind_unseparated(price);
            }
            if let Some(rating) = changes.rating {
                set.push("rating = ").push_bind_unseparated(rating);
            }
            if let Some(image_url) = &changes.image_url {
                set.push("image_url = ").push_bind_unseparated(image_url.clone());
            }
            if let Some(gender) = changes.gender {
                set.push("gender = ").push_bind_unseparated(Gender::column_value(gender));
            }
            if let Some(occasions) = &changes.occasions {
                set.push("occasion = ").push_bind_unseparated(join_occasions(occasions));
            }
            if let Some(discount) = changes.discount {
                set.push("discount = ").push_bind_unseparated(discount);
            }
            if let Some(brand_ids) = &changes.brand_ids {
                set.push("brands = ").push_bind_unseparated(join_brand_ids(brand_ids));
            }
            set.push("updated_at = NOW()");
        }
        builder.push(" WHERE products.id = ");
        builder.push_bind(id);
        builder.push(" RETURNING ");
        builder.push(PRODUCT_COLUMNS);

        let updated: Product = builder
            .build_query_as()
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "product",
                id: id.to_string(),
            })?;

        if let Some(desired) = category_ids {
            let current: Vec<i64> = sqlx::query_scalar(
                "SELECT category_id FROM product_categories WHERE product_id = $1",
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

            let diff = CategoryDiff::compute(desired, &current);
            if !diff.to_remove.is_empty() {
                sqlx::query(
                    "DELETE FROM product_categories WHERE product_id = $1 AND category_id = ANY($2)",
                )
                .bind(id)
                .bind(diff.to_remove.as_slice())
                .execute(&mut *tx)
                .await?;
            }
            insert_categories(&mut *tx, id, &diff.to_insert).await?;
            debug!(
                product_id = id,
                inserted = diff.to_insert.len(),
                removed = diff.to_remove.len(),
                "categories reconciled"
            );
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Filtered, sorted page of products plus totals (`getProducts`).
    pub async fn list(&self, query: &ListingQuery) -> Result<ProductListing, DbError> {
        let mut count_query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(DISTINCT products.id)");
        push_filtered_from(&mut count_query, &query.filter);
        debug!(sql = count_query.sql(), "counting products");

        let count: i64 = count_query.build_query_scalar().fetch_one(self.pool).await?;

        let mut page_query: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT DISTINCT ");
        page_query.push(PRODUCT_COLUMNS);
        push_filtered_from(&mut page_query, &query.filter);
        page_query.push(" ORDER BY ");
        if let Some(sort) = &query.sort {
            page_query.push(sort.order_clause());
            page_query.push(", ");
        }
        page_query.push("products.id ASC");
        page_query.push(" LIMIT ");
        page_query.push_bind(i64::from(query.pagination.limit()));
        page_query.push(" OFFSET ");
        page_query.push_bind(query.pagination.offset() as i64);
        debug!(sql = page_query.sql(), "listing products");

        let products: Vec<Product> = page_query.build_query_as().fetch_all(self.pool).await?;

        Ok(ProductListing {
            count,
            last_page: query.pagination.last_page(count),
            num_of_results_on_cur_page: products.len(),
            products,
        })
    }

    /// Single product by id (`getProduct`).
    pub async fn find(&self, id: i64) -> Result<Option<Product>, DbError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE products.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Delete a product and everything referencing it (`deleteProduct`).
    ///
    /// Foreign keys are deferred for this transaction only; commit re-checks
    /// them, so enforcement is restored even if a step fails.
    pub async fn delete(&self, id: i64) -> Result<DeletedProduct, DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET CONSTRAINTS ALL DEFERRED")
            .execute(&mut *tx)
            .await?;

        let categories = sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let reviews = sqlx::query("DELETE FROM reviews WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let comments = sqlx::query("DELETE FROM comments WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let removed = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if removed == 0 {
            return Err(DbError::NotFound {
                resource: "product",
                id: id.to_string(),
            });
        }

        tx.commit().await?;
        info!(product_id = id, categories, reviews, comments, "product deleted");
        Ok(DeletedProduct {
            categories,
            reviews,
            comments,
        })
    }
}

/// Insert `(product_id, category_id)` links, skipping existing ones.
async fn insert_categories(
    conn: &mut PgConnection,
    product_id: i64,
    category_ids: &[i64],
) -> Result<(), DbError> {
    if category_ids.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("INSERT INTO product_categories (product_id, category_id) ");
    builder.push_values(category_ids, |mut row, category_id| {
        row.push_bind(product_id).push_bind(*category_id);
    });
    builder.push(" ON CONFLICT DO NOTHING");

    builder.build().execute(conn).await.map_err(|err| {
        let missing_category = err
            .as_database_error()
            .is_some_and(|db| db.is_foreign_key_violation());
        if missing_category {
            DbError::NotFound {
                resource: "category",
                id: format!("{category_ids:?}"),
            }
        } else {
            DbError::Sqlx(err)
        }
    })?;
    Ok(())
}

/// `FROM ... WHERE ...` shared by the count and page queries.
fn push_filtered_from(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    builder.push(" FROM products");
    if !filter.category_ids.is_empty() {
        builder.push(" INNER JOIN product_categories ON product_categories.product_id = products.id");
    }
    builder.push(" WHERE 1=1");

    if !filter.brand_ids.is_empty() {
        let ids: Vec<String> = filter.brand_ids.iter().map(i64::to_string).collect();
        builder.push(" AND products.brands ~ ");
        builder.push_bind(word_pattern(&ids));
    }
    if !filter.category_ids.is_empty() {
        builder.push(" AND product_categories.category_id = ANY(");
        builder.push_bind(filter.category_ids.clone());
        builder.push(")");
    }
    if let Some(price) = filter.price_range_to {
        builder.push(" AND products.price <= ");
        builder.push_bind(price);
    }
    if let Some(gender) = filter.gender {
        builder.push(" AND products.gender = ");
        builder.push_bind(gender.as_str());
    }
    if !filter.occasions.is_empty() {
        builder.push(" AND products.occasion ~* ");
        builder.push_bind(word_pattern(&filter.occasions));
    }
    if let Some(range) = filter.discount {
        builder.push(" AND products.discount BETWEEN ");
        builder.push_bind(range.lo);
        builder.push(" AND ");
        builder.push_bind(range.hi);
    }
}

/// Postgres word-boundary alternation over escaped tokens: `\y(a|b)\y`.
fn word_pattern<S: AsRef<str>>(tokens: &[S]) -> String {
    let alternatives: Vec<String> = tokens
        .iter()
        .map(|token| regex::escape(token.as_ref().trim()))
        .collect();
    format!(r"\y({})\y", alternatives.join("|"))
}
