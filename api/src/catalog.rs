//! Caching access to the read-mostly catalog (categories and their items).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use dioxus_logger::tracing::debug;
use tokio::sync::RwLock;

use crate::auth::Session;
use crate::error::ApiResult;
use crate::models::Category;
use crate::models::Item;
use crate::store::GroceryStore;

#[derive(Clone, Debug)]
struct Cached<T> {
    value: T,
    fetched_at: Instant,
}

impl<T: Clone> Cached<T> {
    fn fresh(&self, ttl: Duration) -> Option<T> {
        (self.fetched_at.elapsed() < ttl).then(|| self.value.clone())
    }
}

#[derive(Default)]
struct CatalogCache {
    categories: Option<Cached<Vec<Category>>>,
    items: HashMap<String, Cached<Vec<Item>>>,
}

/// Fetch-and-cache front for the catalog part of a [`GroceryStore`].
///
/// Only calls the store when the cache is empty or older than the TTL.
/// Cloning shares the cache.
#[derive(Clone)]
pub struct CatalogRepository {
    store: Arc<dyn GroceryStore>,
    ttl: Duration,
    cache: Arc<RwLock<CatalogCache>>,
}

impl CatalogRepository {
    pub fn new(store: Arc<dyn GroceryStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            cache: Default::default(),
        }
    }

    pub async fn categories(&self, session: &Session) -> ApiResult<Vec<Category>> {
        if let Some(hit) = self
            .cache
            .read()
            .await
            .categories
            .as_ref()
            .and_then(|c| c.fresh(self.ttl))
        {
            return Ok(hit);
        }

        let mut cache = self.cache.write().await;

        // another task may have filled it while we waited for the write lock.
        if let Some(hit) = cache.categories.as_ref().and_then(|c| c.fresh(self.ttl)) {
            return Ok(hit);
        }

        debug!("catalog: fetching categories");
        let categories = self.store.categories(session).await?;
        cache.categories = Some(Cached {
            value: categories.clone(),
            fetched_at: Instant::now(),
        });
        Ok(categories)
    }

    pub async fn items_in(&self, session: &Session, category: &str) -> ApiResult<Vec<Item>> {
        if let Some(hit) = self
            .cache
            .read()
            .await
            .items
            .get(category)
            .and_then(|c| c.fresh(self.ttl))
        {
            return Ok(hit);
        }

        let mut cache = self.cache.write().await;
        if let Some(hit) = cache.items.get(category).and_then(|c| c.fresh(self.ttl)) {
            return Ok(hit);
        }

        debug!("catalog: fetching items in '{category}'");
        let items = self.store.items_in_category(session, category).await?;
        cache.items.insert(
            category.to_string(),
            Cached {
                value: items.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(items)
    }

    /// Drops everything cached; the next read goes to the store.
    pub async fn invalidate(&self) {
        *self.cache.write().await = CatalogCache::default();
        debug!("catalog: cache invalidated");
    }
}
