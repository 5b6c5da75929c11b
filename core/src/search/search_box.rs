//! The live search box in the navigation bar.
//!
//! # Design
//! Every query change bumps a generation counter and aborts the armed
//! debounce timer before arming a new one, so a burst of keystrokes leaves a
//! single surviving timer and a single network round. A round commits only
//! if its generation is still the latest and the box is still mounted; late
//! answers to older queries are dropped on arrival (the requests themselves
//! are not cancelled).
//!
//! The generation bump, the timer swap and every commit happen under the
//! same `timer` lock, so a commit can never interleave with a query change.
//!
//! View state is published through a `watch` channel.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{aggregate, Dropdown, SearchHit, SearchResults, SEARCH_FAILED};
use crate::api::Api;
use crate::config::DEFAULT_SEARCH_DEBOUNCE;
use crate::http::Transport;
use crate::routes::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// Blank query, nothing armed.
    #[default]
    Idle,
    /// Debounce timer armed.
    Pending,
    /// Three searches in flight.
    Loading,
    Ready,
    Failed,
}

/// Where a pointer-down landed, relative to the search widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Input,
    Panel,
    Outside,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBoxState {
    pub query: String,
    pub phase: SearchPhase,
    pub results: SearchResults,
    pub error: Option<String>,
    pub dropdown_open: bool,
    pub mobile_menu_open: bool,
    pub mobile_search_open: bool,
}

impl SearchBoxState {
    pub fn dropdown(&self) -> Dropdown {
        if !self.dropdown_open {
            return Dropdown::Hidden;
        }
        match self.phase {
            SearchPhase::Pending | SearchPhase::Loading => Dropdown::Loading,
            SearchPhase::Failed => {
                Dropdown::Error(self.error.clone().unwrap_or_else(|| SEARCH_FAILED.to_string()))
            }
            SearchPhase::Idle | SearchPhase::Ready if self.results.is_empty() => Dropdown::NoResults,
            SearchPhase::Idle | SearchPhase::Ready => Dropdown::Sections(self.results.sections()),
        }
    }
}

struct Inner<T> {
    api: Arc<Api<T>>,
    debounce: Duration,
    state: watch::Sender<SearchBoxState>,
    generation: AtomicU64,
    timer: Mutex<Option<JoinHandle<()>>>,
    mounted: AtomicBool,
}

pub struct SearchBox<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Transport> SearchBox<T> {
    pub fn new(api: Arc<Api<T>>) -> Self {
        Self::with_debounce(api, DEFAULT_SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(api: Arc<Api<T>>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchBoxState::default());
        Self {
            inner: Arc::new(Inner {
                api,
                debounce,
                state,
                generation: AtomicU64::new(0),
                timer: Mutex::new(None),
                mounted: AtomicBool::new(true),
            }),
        }
    }

    pub fn state(&self) -> SearchBoxState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchBoxState> {
        self.inner.state.subscribe()
    }

    pub fn dropdown(&self) -> Dropdown {
        self.inner.state.borrow().dropdown()
    }

    /// Input changed. Re-entering the current text is a no-op; a blank
    /// query clears everything at once; anything else (re)arms the
    /// debounce timer.
    pub async fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        if !self.inner.is_mounted() || self.inner.state.borrow().query == query {
            return;
        }

        let mut timer = self.inner.timer.lock().await;
        let generation = self.inner.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(armed) = timer.take() {
            armed.abort();
        }

        if query.trim().is_empty() {
            self.inner.state.send_modify(|state| {
                state.query = query;
                state.phase = SearchPhase::Idle;
                state.results = SearchResults::default();
                state.error = None;
                state.dropdown_open = false;
            });
            return;
        }

        let term = query.trim().to_string();
        self.inner.state.send_modify(|state| {
            state.query = query;
            state.phase = SearchPhase::Pending;
            state.error = None;
        });
        let inner = Arc::clone(&self.inner);
        *timer = Some(tokio::spawn(inner.run_round(generation, term)));
    }

    /// Focusing the input reopens the dropdown when there is something to show.
    pub fn focus(&self) {
        self.inner.state.send_if_modified(|state| {
            if state.results.is_empty() || state.dropdown_open {
                return false;
            }
            state.dropdown_open = true;
            true
        });
    }

    pub fn pointer_down(&self, target: PointerTarget) {
        if target == PointerTarget::Outside {
            self.close_dropdown();
        }
    }

    pub fn close_dropdown(&self) {
        self.inner.state.send_if_modified(|state| {
            let was_open = state.dropdown_open;
            state.dropdown_open = false;
            was_open
        });
    }

    /// A hit was chosen: close the dropdown and the mobile search bar and
    /// hand back where to go.
    pub fn select(&self, hit: &SearchHit) -> Route {
        self.inner.state.send_modify(|state| {
            state.dropdown_open = false;
            state.mobile_search_open = false;
        });
        hit.route.clone()
    }

    /// Form submitted. Returns the search-results route for a non-blank
    /// query and resets the input, dropdown and mobile menus.
    pub async fn submit(&self) -> Option<Route> {
        let route = Route::search(&self.inner.state.borrow().query)?;
        self.set_query(String::new()).await;
        self.inner.state.send_modify(|state| {
            state.dropdown_open = false;
            state.mobile_menu_open = false;
            state.mobile_search_open = false;
        });
        Some(route)
    }

    /// Open or close the mobile search bar. Closing it clears the query.
    pub async fn toggle_mobile_search(&self) {
        let was_open = self.inner.state.borrow().mobile_search_open;
        if was_open {
            self.set_query(String::new()).await;
        }
        self.inner.state.send_modify(|state| state.mobile_search_open = !was_open);
    }

    pub fn toggle_mobile_menu(&self) {
        self.inner
            .state
            .send_modify(|state| state.mobile_menu_open = !state.mobile_menu_open);
    }

    /// Dispose the box: abort any armed timer and drop every later commit.
    pub async fn unmount(&self) {
        self.inner.mounted.store(false, Ordering::Release);
        if let Some(armed) = self.inner.timer.lock().await.take() {
            armed.abort();
        }
    }
}

impl<T> Drop for SearchBox<T> {
    fn drop(&mut self) {
        self.inner.mounted.store(false, Ordering::Release);
        if let Ok(mut timer) = self.inner.timer.try_lock() {
            if let Some(armed) = timer.take() {
                armed.abort();
            }
        }
    }
}

impl<T: Transport> Inner<T> {
    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) == generation
    }

    async fn run_round(self: Arc<Self>, generation: u64, query: String) {
        tokio::time::sleep(self.debounce).await;

        // The timer has fired: from here the round can only be discarded,
        // not aborted.
        {
            let mut timer = self.timer.lock().await;
            if !self.is_current(generation) || !self.is_mounted() {
                return;
            }
            timer.take();
            self.state.send_modify(|state| state.phase = SearchPhase::Loading);
        }

        debug!(%query, generation, "search round started");
        let outcome = aggregate(&self.api, &query).await;

        let _timer = self.timer.lock().await;
        if !self.is_current(generation) || !self.is_mounted() {
            debug!(%query, generation, "dropping stale search round");
            return;
        }
        match outcome {
            Ok(results) => self.state.send_modify(|state| {
                state.results = results;
                state.error = None;
                state.phase = SearchPhase::Ready;
                state.dropdown_open = true;
            }),
            Err(e) => {
                warn!(%query, error = %e, "search round failed");
                self.state.send_modify(|state| {
                    state.results = SearchResults::default();
                    state.error = Some(SEARCH_FAILED.to_string());
                    state.phase = SearchPhase::Failed;
                    state.dropdown_open = true;
                });
            }
        }
    }
}
