//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives stores and both
//! search views over real HTTP using ureq. Validates that request building,
//! envelope parsing and the search round work against an actual server.

use std::sync::Arc;
use std::time::Duration;

use catalog_core::search::SearchPhase;
use catalog_core::{
    Activity, Api, ApiError, Block, CatalogClient, Category, Dropdown, HttpMethod, HttpRequest,
    HttpResponse, MediaResolver, Product, ProductInput, RequestOptions, ResourceStore, Route,
    SearchBox, SearchPage, Shop, Transport,
};
use mock_server::Catalog;
use serde_json::json;

/// Blocking ureq round-trip, moved off the runtime with `spawn_blocking`.
///
/// ureq's status-as-error behavior is disabled so 4xx/5xx responses come
/// back as data and the client interprets them.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
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

fn execute(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, ureq::Error> {
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
    let body = response.body_mut().read_to_string()?;
    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body,
    })
}

impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute(&agent, request))
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .map_err(|e| ApiError::Transport(e.to_string()))
    }
}

fn neighborhood() -> Catalog {
    Catalog::seeded(&json!({
        "blocks": [{"id": 1, "nama": "Blok A"}, {"id": 2, "nama": "Blok B"}],
        "shops": [
            {"id": "s1", "nama": "Warung Bu Sri", "pemilik": "Sri", "alamat": "Blok A-1", "block_id": 1},
            {"id": "s2", "nama": "Toko Kelontong", "pemilik": "Budi", "alamat": "Blok B-3", "block_id": 2}
        ],
        "products": [
            {"id": "p1", "nama": "Ayam Geprek", "harga": 15000, "category_id": 1, "shop_id": "s1"},
            {"id": "p2", "nama": "Nasi Ayam Bakar", "harga": 18000, "category_id": 1, "shop_id": "s1", "foto": "nasi.jpg"},
            {"id": "p3", "nama": "Sabun Cuci", "harga": 5000, "category_id": 3, "shop_id": "s2"}
        ],
        "activities": [
            {"id": 1, "nama": "Lomba Masak Ayam", "waktu_pelaksanaan": "2024-08-17T08:00:00Z", "peserta": "ibu-ibu"},
            {"id": 2, "nama": "Kerja Bakti", "waktu_pelaksanaan": "2024-06-02T07:00:00Z", "peserta": "warga"}
        ]
    }))
}

/// Serve `catalog` on a random port and return an API pointed at it.
async fn start(catalog: Catalog) -> Arc<Api<UreqTransport>> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener, catalog));

    let client = CatalogClient::new(&format!("http://{addr}/api/v1"));
    Arc::new(Api::new(client, UreqTransport::new()))
}

#[tokio::test(flavor = "multi_thread")]
async fn product_store_lifecycle() {
    let api = start(Catalog::new()).await;

    // Mount: one initial fetch of an empty collection.
    let store: ResourceStore<Product, _> = ResourceStore::mount(api.clone()).await;
    let state = store.snapshot().await;
    assert!(state.items.is_empty());
    assert!(!state.loading);
    assert_eq!(state.error, None);

    // Create appends the server's copy.
    let input = ProductInput {
        name: Some("Es Cendol".into()),
        price: Some(7000),
        category_id: Some(2),
        shop_id: Some("s1".into()),
        ..ProductInput::default()
    };
    let created = store.create(&input).await.unwrap();
    assert!(!created.id.is_empty(), "server assigns the id");
    assert_eq!(store.items().await, vec![created.clone()]);

    // Update replaces it in place.
    let change = ProductInput {
        price: Some(8000),
        ..ProductInput::default()
    };
    let updated = store.update(&created.id, &change).await.unwrap();
    assert_eq!(updated.price, 8000);
    assert_eq!(updated.name, "Es Cendol");
    assert_eq!(store.find(&created.id).await.unwrap().price, 8000);

    // A fresh fetch agrees with the local patch.
    store.refetch().await;
    assert_eq!(store.items().await, vec![updated]);

    // Delete drops it locally and on the server.
    store.delete(&created.id).await.unwrap();
    assert!(store.items().await.is_empty());
    let err = store.fetch_one(&created.id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(store.error().await.as_deref(), Some("HTTP error! status: 404"));
}

#[tokio::test(flavor = "multi_thread")]
async fn caller_headers_reach_the_server() {
    let api = start(Catalog::new()).await;

    let options = RequestOptions {
        headers: vec![
            ("Content-Type".to_string(), "application/json; charset=utf-8".to_string()),
            ("x-client".to_string(), "sentra".to_string()),
        ],
        ..RequestOptions::method(HttpMethod::Post)
    }
    .with_body(&json!({"nama": "Minuman"}))
    .unwrap();
    let request = api.client().request("/categories", options).unwrap();
    assert_eq!(request.headers.len(), 2, "content-type is replaced, not duplicated");

    let created: Category = api.send(request).await.unwrap();
    assert_eq!(created.name, "Minuman");
    assert_eq!(api.list::<Category>().await.unwrap(), vec![created]);
}

#[tokio::test(flavor = "multi_thread")]
async fn nested_routes() {
    let api = start(neighborhood()).await;

    let block: Block = api.get::<Block>(&1).await.unwrap();
    let shops = block.shops.unwrap_or_default();
    assert_eq!(shops.len(), 1);
    assert_eq!(shops[0].name, "Warung Bu Sri");

    let products = api.products_by_shop("s1").await.unwrap();
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Ayam Geprek", "Nasi Ayam Bakar"]);

    let store: ResourceStore<Shop, _> = ResourceStore::new(api);
    let found = store.search("kelontong").await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].owner, "Budi");
}

#[tokio::test(flavor = "multi_thread")]
async fn search_box_round_over_http() {
    let api = start(neighborhood()).await;
    let search = SearchBox::with_debounce(api, Duration::from_millis(20));
    let mut state = search.subscribe();

    search.set_query("ayam").await;
    let ready = tokio::time::timeout(
        Duration::from_secs(5),
        state.wait_for(|s| s.phase == SearchPhase::Ready),
    )
    .await
    .expect("search round timed out")
    .unwrap()
    .clone();

    assert_eq!(ready.results.products.len(), 2);
    assert!(ready.results.shops.is_empty());
    assert_eq!(ready.results.activities.len(), 1);

    let Dropdown::Sections(sections) = search.dropdown() else {
        panic!("expected result sections, got {:?}", search.dropdown());
    };
    let titles: Vec<_> = sections.iter().map(|s| s.title).collect();
    assert_eq!(titles, ["Products", "Activities"]);

    let route = search.select(&sections[1].hits[0]);
    assert_eq!(route, Route::Activity(1));
    assert_eq!(search.dropdown(), Dropdown::Hidden);
}

#[tokio::test(flavor = "multi_thread")]
async fn search_page_over_http() {
    let api = start(neighborhood()).await;
    let page = SearchPage::new(api, MediaResolver::new("https://media.test"));

    page.load("ayam").await;

    let state = page.state();
    assert!(!state.loading);
    assert_eq!(state.error, None);

    let sections = page.sections();
    assert_eq!(sections[0].cards.len(), 2);
    assert!(sections[1].cards.is_empty());
    assert_eq!(sections[1].empty_notice, "No shops found.");

    let nasi = &sections[0].cards[1];
    assert_eq!(nasi.subtitle.as_deref(), Some("Rp 18.000"));
    assert_eq!(
        nasi.image.as_ref().map(|i| i.src.as_str()),
        Some("https://media.test/photos/nasi.jpg")
    );
    assert_eq!(sections[2].cards[0].subtitle.as_deref(), Some("17/8/2024"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = CatalogClient::new(&format!("http://{addr}/api/v1"));
    let api = Api::new(client, UreqTransport::new());

    let err = api.list::<Activity>().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
}
