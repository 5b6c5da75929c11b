//! Async API surface: a [`CatalogClient`] paired with a [`Transport`].
//!
//! One explicitly constructed `Api` is shared (behind `Arc`) by every store
//! and search view of a session. No retry, caching, deduplication or
//! cancellation happens here; a failed call is logged and returned.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::CatalogClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, Transport};
use crate::types::{Activity, Product, Resource, Shop};

#[derive(Debug)]
pub struct Api<T> {
    client: CatalogClient,
    transport: T,
}

impl<T: Transport> Api<T> {
    pub fn new(client: CatalogClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn from_config(config: &ClientConfig, transport: T) -> Self {
        Self::new(CatalogClient::new(&config.base_url), transport)
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute a request built by the caller and unwrap the envelope.
    pub async fn send<D: DeserializeOwned>(&self, request: HttpRequest) -> Result<D, ApiError> {
        let response = self.execute(request).await?;
        self.client.parse_data(response)
    }

    async fn execute(&self, request: HttpRequest) -> Result<crate::http::HttpResponse, ApiError> {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "api request");
        match self.transport.execute(request).await {
            Ok(response) => {
                if !response.is_success() {
                    warn!(%method, %url, status = response.status, "api request failed");
                }
                Ok(response)
            }
            Err(e) => {
                warn!(%method, %url, error = %e, "api request failed");
                Err(e)
            }
        }
    }

    async fn fetch_list<R: Resource>(&self, request: HttpRequest) -> Result<Vec<R>, ApiError> {
        let response = self.execute(request).await?;
        self.client.parse_list(response)
    }

    pub async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        self.fetch_list(self.client.build_list::<R>()).await
    }

    pub async fn search<R: Resource>(&self, query: &str) -> Result<Vec<R>, ApiError> {
        self.fetch_list(self.client.build_search::<R>(query)).await
    }

    pub async fn get<R: Resource>(&self, id: &R::Id) -> Result<R, ApiError> {
        self.send(self.client.build_get::<R>(id)).await
    }

    pub async fn create<R: Resource>(&self, input: &R::Input) -> Result<R, ApiError> {
        self.send(self.client.build_create::<R>(input)?).await
    }

    pub async fn update<R: Resource>(&self, id: &R::Id, input: &R::Input) -> Result<R, ApiError> {
        self.send(self.client.build_update::<R>(id, input)?).await
    }

    pub async fn delete<R: Resource>(&self, id: &R::Id) -> Result<(), ApiError> {
        let response = self.execute(self.client.build_delete::<R>(id)).await?;
        self.client.parse_empty(response)
    }

    pub async fn products_by_shop(&self, shop_id: &str) -> Result<Vec<Product>, ApiError> {
        self.fetch_list(self.client.build_products_by_shop(shop_id)).await
    }

    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        self.search::<Product>(query).await
    }

    pub async fn search_shops(&self, query: &str) -> Result<Vec<Shop>, ApiError> {
        self.search::<Shop>(query).await
    }

    pub async fn search_activities(&self, query: &str) -> Result<Vec<Activity>, ApiError> {
        self.search::<Activity>(query).await
    }
}
