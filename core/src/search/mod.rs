//! Cross-entity search.
//!
//! # Overview
//! One query fans out into three backend searches (products, shops,
//! activities) that run concurrently and are merged into [`SearchResults`].
//! The round is all-or-nothing: if any of the three fails, the whole round
//! fails and no partial results are shown.
//!
//! Two views consume it independently:
//! - [`SearchBox`]: the live, debounced dropdown in the navigation bar.
//! - [`SearchPage`]: the `/search?query=` results view, which runs its own
//!   round on load. Nothing is handed over between the two.

mod page;
mod search_box;

pub use page::{Card, PageSection, SearchPage, SearchPageState};
pub use search_box::{PointerTarget, SearchBox, SearchBoxState, SearchPhase};

use tracing::instrument;

use crate::api::Api;
use crate::error::ApiError;
use crate::http::Transport;
use crate::routes::Route;
use crate::types::{Activity, Product, Shop};

/// Message shown for any failed round.
pub const SEARCH_FAILED: &str = "Failed to fetch search results.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    pub products: Vec<Product>,
    pub shops: Vec<Shop>,
    pub activities: Vec<Activity>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.shops.is_empty() && self.activities.is_empty()
    }

    /// Non-empty groups in display order: Products, Shops, Activities.
    pub fn sections(&self) -> Vec<ResultSection> {
        let products = self.products.iter().map(|p| SearchHit {
            label: p.name.clone(),
            route: Route::Product(p.id.clone()),
        });
        let shops = self.shops.iter().map(|s| SearchHit {
            label: s.name.clone(),
            route: Route::Store(s.id.clone()),
        });
        let activities = self.activities.iter().map(|a| SearchHit {
            label: a.name.clone(),
            route: Route::Activity(a.id),
        });

        [
            ResultSection::new("Products", products.collect()),
            ResultSection::new("Shops", shops.collect()),
            ResultSection::new("Activities", activities.collect()),
        ]
        .into_iter()
        .filter(|section| !section.hits.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub label: String,
    pub route: Route,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSection {
    pub title: &'static str,
    pub hits: Vec<SearchHit>,
}

impl ResultSection {
    fn new(title: &'static str, hits: Vec<SearchHit>) -> Self {
        Self { title, hits }
    }
}

/// What the dropdown under the search box currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dropdown {
    Hidden,
    Loading,
    Error(String),
    NoResults,
    Sections(Vec<ResultSection>),
}

/// Run the three searches for `query` concurrently and merge them.
///
/// # Errors
/// The first failing search fails the whole round.
#[instrument(skip(api))]
pub async fn aggregate<T: Transport>(api: &Api<T>, query: &str) -> Result<SearchResults, ApiError> {
    let (products, shops, activities) = tokio::try_join!(
        api.search_products(query),
        api.search_shops(query),
        api.search_activities(query),
    )?;
    Ok(SearchResults {
        products,
        shops,
        activities,
    })
}
