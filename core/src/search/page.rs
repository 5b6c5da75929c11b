//! The `/search?query=` results view.
//!
//! Runs its own round on every load; a blank query shows empty sections
//! without touching the network. Overlapping loads are resolved by
//! generation: only the latest load commits.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::{aggregate, SearchResults, SEARCH_FAILED};
use crate::api::Api;
use crate::format::{format_date, format_rupiah};
use crate::http::Transport;
use crate::media::{ImageSource, MediaKind, MediaResolver};
use crate::routes::Route;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPageState {
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub results: SearchResults,
}

/// One result card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<ImageSource>,
    pub link_label: &'static str,
    pub route: Route,
}

/// A results section; unlike the dropdown, empty sections are kept and
/// show `empty_notice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSection {
    pub title: &'static str,
    pub empty_notice: &'static str,
    pub cards: Vec<Card>,
}

pub struct SearchPage<T> {
    api: Arc<Api<T>>,
    media: MediaResolver,
    state: watch::Sender<SearchPageState>,
    generation: AtomicU64,
    mounted: AtomicBool,
}

impl<T: Transport> SearchPage<T> {
    pub fn new(api: Arc<Api<T>>, media: MediaResolver) -> Self {
        let (state, _) = watch::channel(SearchPageState::default());
        Self {
            api,
            media,
            state,
            generation: AtomicU64::new(0),
            mounted: AtomicBool::new(true),
        }
    }

    pub fn state(&self) -> SearchPageState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchPageState> {
        self.state.subscribe()
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    fn can_commit(&self, generation: u64) -> bool {
        self.mounted.load(Ordering::Acquire)
            && self.generation.load(Ordering::Acquire) == generation
    }

    /// Load results for `query`, the value of the route's `query` parameter.
    pub async fn load(&self, query: &str) {
        if !self.mounted.load(Ordering::Acquire) {
            return;
        }
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let query = query.trim().to_string();

        if query.is_empty() {
            self.state.send_modify(|state| {
                *state = SearchPageState::default();
            });
            return;
        }

        self.state.send_modify(|state| {
            state.query = query.clone();
            state.loading = true;
            state.error = None;
        });

        let outcome = aggregate(&self.api, &query).await;
        if !self.can_commit(generation) {
            debug!(%query, generation, "dropping stale search page load");
            return;
        }

        self.state.send_modify(|state| {
            match outcome {
                Ok(results) => state.results = results,
                Err(e) => {
                    warn!(%query, error = %e, "search page load failed");
                    state.results = SearchResults::default();
                    state.error = Some(SEARCH_FAILED.to_string());
                }
            }
            state.loading = false;
        });
    }

    /// Products, Shops and Activities sections, always all three.
    pub fn sections(&self) -> Vec<PageSection> {
        let state = self.state.borrow();
        let results = &state.results;

        let products = results
            .products
            .iter()
            .map(|p| Card {
                title: p.name.clone(),
                subtitle: Some(format_rupiah(p.price)),
                image: Some(self.media.resolve(p.photo.as_deref(), MediaKind::Product)),
                link_label: "View Details",
                route: Route::Product(p.id.clone()),
            })
            .collect();
        let shops = results
            .shops
            .iter()
            .map(|s| Card {
                title: s.name.clone(),
                subtitle: Some(s.address.clone()),
                image: None,
                link_label: "View Store",
                route: Route::Store(s.id.clone()),
            })
            .collect();
        let activities = results
            .activities
            .iter()
            .map(|a| Card {
                title: a.name.clone(),
                subtitle: Some(format_date(a)),
                image: None,
                link_label: "View Activity",
                route: Route::Activity(a.id),
            })
            .collect();

        vec![
            PageSection {
                title: "Products",
                empty_notice: "No products found.",
                cards: products,
            },
            PageSection {
                title: "Shops",
                empty_notice: "No shops found.",
                cards: shops,
            },
            PageSection {
                title: "Activities",
                empty_notice: "No activities found.",
                cards: activities,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{
        activity_json, fake_api, path_of, product_json, query_of, shop_json, FakeTransport, Reply,
    };

    fn page(api: Arc<Api<FakeTransport>>) -> SearchPage<FakeTransport> {
        SearchPage::new(api, MediaResolver::new("https://sentratamansari.com"))
    }

    #[tokio::test]
    async fn load_fills_all_sections() {
        let api = fake_api(|req| match path_of(req) {
            "/products" => Reply::data(serde_json::json!([product_json("p1", "Soto Ayam")])),
            "/shops" => Reply::data(serde_json::json!([shop_json("s1", "Warung Soto")])),
            _ => Reply::data(serde_json::json!([activity_json(2, "Bazar", "2024-03-09T08:00:00Z")])),
        });
        let page = page(api);
        page.load(" soto ").await;

        let state = page.state();
        assert_eq!(state.query, "soto");
        assert!(!state.loading);

        let sections = page.sections();
        assert_eq!(sections.len(), 3);
        let product = &sections[0].cards[0];
        assert_eq!(product.subtitle.as_deref(), Some("Rp 12.000"));
        assert_eq!(
            product.image.as_ref().map(|i| i.src.as_str()),
            Some("/assets/default-food.jpg")
        );
        assert_eq!(sections[1].cards[0].subtitle.as_deref(), Some("Blok A-1"));
        assert_eq!(sections[2].cards[0].subtitle.as_deref(), Some("9/3/2024"));
    }

    #[tokio::test]
    async fn blank_query_skips_network() {
        let api = fake_api(|_| Reply::data(serde_json::json!([])));
        let page = page(api.clone());
        page.load("  ").await;

        assert_eq!(api.transport().count(), 0);
        assert!(page.sections().iter().all(|s| s.cards.is_empty()));
    }

    #[tokio::test]
    async fn failure_shows_message_without_results() {
        let api = fake_api(|req| match path_of(req) {
            "/activities" => Reply::unreachable(),
            _ => Reply::data(serde_json::json!([])),
        });
        let page = page(api);
        page.load("ayam").await;

        let state = page.state();
        assert_eq!(state.error.as_deref(), Some(SEARCH_FAILED));
        assert!(!state.loading);
        assert!(state.results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn older_load_cannot_overwrite_newer() {
        let api = fake_api(|req| {
            let q = query_of(req).unwrap_or_default();
            let delay = if q == "kopi" { 1000 } else { 10 };
            let data = match path_of(req) {
                "/products" => serde_json::json!([product_json("p1", &q)]),
                _ => serde_json::json!([]),
            };
            Reply::data(data).after(Duration::from_millis(delay))
        });
        let page = Arc::new(page(api));

        let slow = tokio::spawn({
            let page = page.clone();
            async move { page.load("kopi").await }
        });
        tokio::time::sleep(Duration::from_millis(1)).await;
        page.load("teh").await;
        slow.await.unwrap();

        assert_eq!(page.state().results.products[0].name, "teh");
    }

    #[tokio::test]
    async fn unmounted_page_neither_fetches_nor_commits() {
        let api = fake_api(|_| Reply::data(serde_json::json!([product_json("p1", "Ayam")])));
        let page = page(api.clone());
        page.unmount();

        page.load("ayam").await;
        page.load("").await;

        assert_eq!(api.transport().count(), 0);
        assert_eq!(page.state(), SearchPageState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_during_load_drops_the_answer() {
        let api = fake_api(|_| {
            Reply::data(serde_json::json!([product_json("p1", "Ayam")]))
                .after(Duration::from_millis(500))
        });
        let page = Arc::new(page(api));

        let load = tokio::spawn({
            let page = page.clone();
            async move { page.load("ayam").await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        page.unmount();
        load.await.unwrap();

        assert!(page.state().results.is_empty());
    }
}
