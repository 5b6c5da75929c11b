//! Subcommand implementations.
//!
//! Every command builds the views it needs from one shared [`Session`] and
//! prints plain text to stdout; progress and failures go through `tracing`
//! to stderr.

pub mod activities;
pub mod neighborhood;
pub mod products;
pub mod search;
pub mod shops;

use std::sync::Arc;

use catalog_core::{Api, ClientConfig, MediaResolver, Resource, ResourceStore};
use thiserror::Error;

use crate::transport::UreqTransport;

/// Errors raised by the CLI itself, on top of the core's `ApiError`.
#[derive(Debug, Error)]
pub enum CliError {
    /// A store's fetch failed; the message is what the store recorded.
    #[error("Could not load {resource}s: {message}")]
    Fetch {
        resource: &'static str,
        message: String,
    },

    /// The search text was blank.
    #[error("Search query is empty")]
    EmptyQuery,

    /// A `--from`/`--to` value that is not a date.
    #[error("Invalid date: {0}. Use YYYY-MM-DD or an RFC 3339 datetime")]
    InvalidDate(String),

    /// The search box never settled.
    #[error("Search did not finish within {0} seconds")]
    SearchTimeout(u64),
}

/// What every command gets: the shared API and the loaded configuration.
pub struct Session {
    pub api: Arc<Api<UreqTransport>>,
    pub config: ClientConfig,
}

impl Session {
    pub fn media(&self) -> MediaResolver {
        MediaResolver::from_config(&self.config)
    }

    /// Mount a store for `R` and fail if its initial fetch did.
    pub async fn load<R: Resource>(&self) -> Result<ResourceStore<R, UreqTransport>, CliError> {
        let store = ResourceStore::mount(Arc::clone(&self.api)).await;
        match store.error().await {
            Some(message) => Err(CliError::Fetch {
                resource: R::NAME,
                message,
            }),
            None => Ok(store),
        }
    }
}
