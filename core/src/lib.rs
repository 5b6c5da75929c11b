//! Client core for the Sentra Tamansari neighborhood catalog.
//!
//! # Overview
//! Shops grouped by housing block, their products, community activities,
//! and one search box across all three, all read from the catalog REST API.
//!
//! # Design
//! - `CatalogClient` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network. A host-supplied
//!   [`Transport`] performs the round-trip; [`Api`] pairs the two.
//! - [`ResourceStore`] is the per-view state container for one entity:
//!   list, `loading`, `error`, CRUD that patches the local list.
//! - [`search`] fans one query out to three searches, debounces live input
//!   and drops responses that arrive for a query the user has moved past.
//! - Entities are read-only mirrors of backend records.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod media;
pub mod routes;
pub mod search;
pub mod selectors;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use api::Api;
pub use client::{CatalogClient, Envelope, RequestOptions};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use media::{ImageSource, MediaKind, MediaResolver};
pub use routes::Route;
pub use search::{Dropdown, SearchBox, SearchPage, SearchResults};
pub use store::{ResourceStore, StoreState};
pub use types::{
    Activity, ActivityInput, Block, BlockInput, Category, CategoryInput, HouseNumber,
    HouseNumberInput, Product, ProductInput, Resource, Shop, ShopInput,
};
