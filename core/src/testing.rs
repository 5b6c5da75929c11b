//! In-memory transport for unit tests.
//!
//! A handler closure decides the reply per request; every request is logged
//! at the moment it is issued, before any simulated latency.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::Api;
use crate::client::CatalogClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

pub(crate) const BASE_URL: &str = "http://catalog.test/api/v1";

pub(crate) struct Reply {
    status: u16,
    body: String,
    delay: Duration,
    unreachable: bool,
}

impl Reply {
    /// 200 with `data` wrapped in the success envelope.
    pub(crate) fn data(data: serde_json::Value) -> Self {
        let body = serde_json::json!({"status": "success", "message": "ok", "data": data});
        Self {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
            unreachable: false,
        }
    }

    pub(crate) fn status(status: u16) -> Self {
        Self {
            status,
            body: r#"{"status":"error","message":"failed"}"#.to_string(),
            delay: Duration::ZERO,
            unreachable: false,
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::status(0)
        }
    }

    pub(crate) fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Handler = dyn Fn(&HttpRequest) -> Reply + Send + Sync;

pub(crate) struct FakeTransport {
    handler: Box<Handler>,
    log: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub(crate) fn new<F>(handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> Reply + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            log: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.log.lock().unwrap().clone()
    }

    pub(crate) fn count(&self) -> usize {
        self.log.lock().unwrap().len()
    }
}

impl Transport for FakeTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send {
        let reply = (self.handler)(&request);
        self.log.lock().unwrap().push(request);
        async move {
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            if reply.unreachable {
                return Err(ApiError::Transport("connection refused".to_string()));
            }
            Ok(HttpResponse {
                status: reply.status,
                headers: Vec::new(),
                body: reply.body,
            })
        }
    }
}

pub(crate) fn fake_api<F>(handler: F) -> Arc<Api<FakeTransport>>
where
    F: Fn(&HttpRequest) -> Reply + Send + Sync + 'static,
{
    Arc::new(Api::new(CatalogClient::new(BASE_URL), FakeTransport::new(handler)))
}

/// Path after the base URL, without the query string.
pub(crate) fn path_of(request: &HttpRequest) -> &str {
    let rest = request.url.strip_prefix(BASE_URL).unwrap_or(&request.url);
    rest.split('?').next().unwrap_or(rest)
}

/// Decoded `q` parameter, if any.
pub(crate) fn query_of(request: &HttpRequest) -> Option<String> {
    url::Url::parse(&request.url)
        .ok()?
        .query_pairs()
        .find(|(k, _)| k == "q")
        .map(|(_, v)| v.into_owned())
}

pub(crate) fn product_json(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({"id": id, "nama": name, "harga": 12000, "category_id": 1, "shop_id": "s1"})
}

pub(crate) fn shop_json(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({"id": id, "nama": name, "pemilik": "Bu Sri", "alamat": "Blok A-1", "block_id": 1})
}

pub(crate) fn activity_json(id: u64, name: &str, at: &str) -> serde_json::Value {
    serde_json::json!({"id": id, "nama": name, "waktu_pelaksanaan": at, "peserta": "warga"})
}
