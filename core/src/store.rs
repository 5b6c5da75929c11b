//! Per-view resource stores.
//!
//! # Design
//! A `ResourceStore` is the state container one view owns for one entity:
//! the fetched list plus `loading` and `error`. It is a cache snapshot, not
//! a source of truth; writes go to the backend and the store patches its
//! local list with whatever the server returned.
//!
//! State is locked only around each read or commit, never across a network
//! call. Two concurrent mutations on the same store therefore race: the one
//! whose response arrives last is applied last. After [`ResourceStore::unmount`]
//! nothing commits, so late responses cannot touch a disposed view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::RwLock;
use tracing::debug;

use crate::api::Api;
use crate::error::ApiError;
use crate::http::Transport;
use crate::selectors;
use crate::types::{Activity, HouseNumber, Product, Resource};

/// Snapshot of a store.
#[derive(Debug, Clone)]
pub struct StoreState<R> {
    pub items: Vec<R>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<R> Default for StoreState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

pub struct ResourceStore<R, T> {
    api: Arc<Api<T>>,
    state: RwLock<StoreState<R>>,
    mounted: AtomicBool,
}

impl<R: Resource, T: Transport> ResourceStore<R, T> {
    /// An empty store; nothing is fetched.
    pub fn new(api: Arc<Api<T>>) -> Self {
        Self {
            api,
            state: RwLock::new(StoreState::default()),
            mounted: AtomicBool::new(true),
        }
    }

    /// A store that has run its one initial `fetch_all`.
    pub async fn mount(api: Arc<Api<T>>) -> Self {
        let store = Self::new(api);
        store.fetch_all().await;
        store
    }

    /// Stop committing results. In-flight calls still finish, their
    /// responses are dropped.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub async fn snapshot(&self) -> StoreState<R> {
        self.state.read().await.clone()
    }

    pub async fn items(&self) -> Vec<R> {
        self.state.read().await.items.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    async fn begin(&self, clear_error: bool) {
        self.commit(|state| {
            state.loading = true;
            if clear_error {
                state.error = None;
            }
        })
        .await;
    }

    async fn commit<F>(&self, apply: F)
    where
        F: FnOnce(&mut StoreState<R>),
    {
        if !self.is_mounted() {
            debug!(resource = R::NAME, "store unmounted, dropping update");
            return;
        }
        apply(&mut *self.state.write().await);
    }

    // Record the outcome of a call and always end with `loading = false`.
    async fn finish<V>(&self, result: &Result<V, ApiError>, on_ok: impl FnOnce(&mut StoreState<R>, &V)) {
        self.commit(|state| {
            match result {
                Ok(value) => on_ok(state, value),
                Err(e) => state.error = Some(e.to_string()),
            }
            state.loading = false;
        })
        .await;
    }

    /// Replace the list with the full collection. Failures land in `error`.
    pub async fn fetch_all(&self) {
        self.begin(true).await;
        let result = self.api.list::<R>().await;
        self.finish(&result, |state, items| state.items = items.clone())
            .await;
    }

    pub async fn refetch(&self) {
        self.fetch_all().await;
    }

    /// Fetch one entity without touching the list.
    pub async fn fetch_one(&self, id: &R::Id) -> Result<R, ApiError> {
        self.begin(true).await;
        let result = self.api.get::<R>(id).await;
        self.finish(&result, |_, _| {}).await;
        result
    }

    /// Replace the list with the backend's matches for `query`. A failure
    /// is recorded in `error` and yields an empty list.
    pub async fn search(&self, query: &str) -> Vec<R> {
        self.begin(true).await;
        let result = self.api.search::<R>(query).await;
        self.finish(&result, |state, items| state.items = items.clone())
            .await;
        result.unwrap_or_default()
    }

    /// Create on the server and append the returned entity. No duplicate
    /// check: a repeated call appends again.
    pub async fn create(&self, input: &R::Input) -> Result<R, ApiError> {
        self.begin(false).await;
        let result = self.api.create::<R>(input).await;
        self.finish(&result, |state, created| state.items.push(created.clone()))
            .await;
        result
    }

    /// Update on the server and replace the first local item with that id.
    pub async fn update(&self, id: &R::Id, input: &R::Input) -> Result<R, ApiError> {
        self.begin(false).await;
        let result = self.api.update::<R>(id, input).await;
        self.finish(&result, |state, updated| {
            if let Some(slot) = state.items.iter_mut().find(|item| item.id() == id) {
                *slot = updated.clone();
            }
        })
        .await;
        result
    }

    /// Delete on the server and drop the id from the local list.
    pub async fn delete(&self, id: &R::Id) -> Result<(), ApiError> {
        self.begin(false).await;
        let result = self.api.delete::<R>(id).await;
        self.finish(&result, |state, _| state.items.retain(|item| item.id() != id))
            .await;
        result
    }

    /// Look `id` up in the already-fetched list.
    pub async fn find(&self, id: &R::Id) -> Result<R, ApiError> {
        self.state
            .read()
            .await
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: R::NAME,
                id: id.to_string(),
            })
    }
}

impl<T: Transport> ResourceStore<Product, T> {
    /// Replace the list with one shop's products.
    pub async fn fetch_by_shop(&self, shop_id: &str) {
        self.begin(true).await;
        let result = self.api.products_by_shop(shop_id).await;
        self.finish(&result, |state, items| state.items = items.clone())
            .await;
    }

    pub async fn recommended<G: Rng + ?Sized>(&self, category_id: Option<u64>, rng: &mut G) -> Vec<Product> {
        selectors::recommended_products(&self.state.read().await.items, category_id, rng)
    }
}

impl<T: Transport> ResourceStore<Activity, T> {
    pub async fn in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Activity> {
        selectors::activities_in_range(&self.state.read().await.items, start, end)
    }

    pub async fn upcoming(&self, now: DateTime<Utc>) -> Vec<Activity> {
        selectors::upcoming_activities(&self.state.read().await.items, now)
    }

    pub async fn past(&self, now: DateTime<Utc>) -> Vec<Activity> {
        selectors::past_activities(&self.state.read().await.items, now)
    }
}

impl<T: Transport> ResourceStore<HouseNumber, T> {
    pub async fn by_block(&self, block_id: u64) -> Vec<HouseNumber> {
        selectors::house_numbers_by_block(&self.state.read().await.items, block_id)
    }
}
