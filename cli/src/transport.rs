//! Blocking ureq agent behind the async [`Transport`] seam.

use catalog_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};

/// Executes catalog requests with a shared ureq agent.
///
/// ureq's status-as-error behavior is disabled so 4xx/5xx responses come
/// back as data and the core client decides what they mean. Each call runs
/// on tokio's blocking pool.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn round_trip(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, ureq::Error> {
    let headers = &req.headers;
    let mut response = match (req.method, req.body.as_deref()) {
        (HttpMethod::Get, _) => with_headers(agent.get(&req.url), headers).call(),
        (HttpMethod::Delete, _) => with_headers(agent.delete(&req.url), headers).call(),
        (HttpMethod::Post, Some(body)) => {
            with_headers(agent.post(&req.url), headers).send(body.as_bytes())
        }
        (HttpMethod::Post, None) => with_headers(agent.post(&req.url), headers).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            with_headers(agent.put(&req.url), headers).send(body.as_bytes())
        }
        (HttpMethod::Put, None) => with_headers(agent.put(&req.url), headers).send_empty(),
    }?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response.body_mut().read_to_string()?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || round_trip(&agent, request))
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .map_err(|e| ApiError::Transport(e.to_string()))
    }
}
