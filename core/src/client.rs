//! Stateless HTTP request builder and response parser for the catalog API.
//!
//! # Design
//! `CatalogClient` holds only a `base_url` and carries no mutable state
//! between calls. Every operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the round-trip (see [`crate::Api`]).
//!
//! Every backend response wraps its payload as `{data, message, status}`;
//! the parse side unwraps `data` and drops the rest.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Product, Resource, Shop};

/// The `{data, message, status}` wrapper around every response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Options for [`CatalogClient::request`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn method(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }
}

/// Synchronous, stateless client for the catalog API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `base_url + endpoint`.
    ///
    /// `content-type: application/json` is always sent; a caller header of
    /// the same name replaces it, other caller headers are appended.
    pub fn request(&self, endpoint: &str, options: RequestOptions) -> Result<HttpRequest, ApiError> {
        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        for (name, value) in options.headers {
            match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
                Some(existing) => *existing = (name, value),
                None => headers.push((name, value)),
            }
        }

        let body = options
            .body
            .map(|value| serde_json::to_string(&value))
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;

        Ok(HttpRequest {
            method: options.method,
            url: format!("{}{endpoint}", self.base_url),
            headers,
            body,
        })
    }

    // Infallible for bodiless requests; the only error source is body encoding.
    fn bodiless(&self, method: HttpMethod, endpoint: &str) -> HttpRequest {
        let headers = vec![("content-type".to_string(), "application/json".to_string())];
        HttpRequest {
            method,
            url: format!("{}{endpoint}", self.base_url),
            headers,
            body: None,
        }
    }

    pub fn build_list<R: Resource>(&self) -> HttpRequest {
        self.bodiless(HttpMethod::Get, R::PATH)
    }

    /// `GET {PATH}?q=<query>`; the query is form-urlencoded.
    pub fn build_search<R: Resource>(&self, query: &str) -> HttpRequest {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .append_pair("q", query)
            .finish();
        self.bodiless(HttpMethod::Get, &format!("{}?{encoded}", R::PATH))
    }

    pub fn build_get<R: Resource>(&self, id: &R::Id) -> HttpRequest {
        self.bodiless(HttpMethod::Get, &format!("{}/{id}", R::PATH))
    }

    pub fn build_create<R: Resource>(&self, input: &R::Input) -> Result<HttpRequest, ApiError> {
        self.request(R::PATH, RequestOptions::method(HttpMethod::Post).with_body(input)?)
    }

    pub fn build_update<R: Resource>(
        &self,
        id: &R::Id,
        input: &R::Input,
    ) -> Result<HttpRequest, ApiError> {
        self.request(
            &format!("{}/{id}", R::PATH),
            RequestOptions::method(HttpMethod::Put).with_body(input)?,
        )
    }

    pub fn build_delete<R: Resource>(&self, id: &R::Id) -> HttpRequest {
        self.bodiless(HttpMethod::Delete, &format!("{}/{id}", R::PATH))
    }

    /// `GET /shops/{shop_id}/products`.
    pub fn build_products_by_shop(&self, shop_id: &str) -> HttpRequest {
        self.bodiless(
            HttpMethod::Get,
            &format!("{}/{shop_id}{}", Shop::PATH, Product::PATH),
        )
    }

    /// Unwrap `data` from a 2xx envelope.
    pub fn parse_data<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        let envelope: Envelope<T> = decode_envelope(response)?;
        envelope
            .data
            .ok_or_else(|| ApiError::Deserialization("response envelope has no data".to_string()))
    }

    /// Like [`CatalogClient::parse_data`], but a null or missing `data`
    /// means an empty list.
    pub fn parse_list<R: Resource>(&self, response: HttpResponse) -> Result<Vec<R>, ApiError> {
        let envelope: Envelope<Vec<R>> = decode_envelope(response)?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Check the status of a response whose body is not needed.
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn decode_envelope<T: DeserializeOwned>(response: HttpResponse) -> Result<Envelope<T>, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-2xx status codes to `ApiError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
