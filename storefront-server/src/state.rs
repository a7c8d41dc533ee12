//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;
use storefront_core::DEFAULT_PAGE_SIZE;

use crate::revalidate::Revalidator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: PgPool,
    revalidator: Revalidator,
    default_page_size: u32,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self::with_page_size(pool, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(pool: PgPool, default_page_size: u32) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pool,
                revalidator: Revalidator::default(),
                default_page_size,
            }),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    pub fn revalidator(&self) -> &Revalidator {
        &self.inner.revalidator
    }

    pub fn default_page_size(&self) -> u32 {
        self.inner.default_page_size
    }
}
