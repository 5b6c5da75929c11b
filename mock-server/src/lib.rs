//! In-memory stand-in for the catalog REST API.
//!
//! Serves `/api/v1/{collection}` for shops, products, categories, blocks,
//! house-numbers and activities. Rows are kept as raw JSON objects in
//! insertion order; every response uses the `{status, message, data}`
//! envelope. `?q=` filters on the name and description fields.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdKind {
    Text,
    Number,
}

const COLLECTIONS: [(&str, IdKind); 6] = [
    ("shops", IdKind::Text),
    ("products", IdKind::Text),
    ("categories", IdKind::Number),
    ("blocks", IdKind::Number),
    ("house-numbers", IdKind::Number),
    ("activities", IdKind::Number),
];

const SEARCH_FIELDS: [&str; 3] = ["nama", "deskripsi", "description"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    pub message: String,
    pub data: T,
}

type Reply = (StatusCode, Json<Envelope<Value>>);

fn success(status: StatusCode, message: &str, data: Value) -> Reply {
    (
        status,
        Json(Envelope {
            status: "success".to_string(),
            message: message.to_string(),
            data,
        }),
    )
}

fn failure(status: StatusCode, message: String) -> Reply {
    (
        status,
        Json(Envelope {
            status: "error".to_string(),
            message,
            data: Value::Null,
        }),
    )
}

#[derive(Debug)]
struct Collection {
    id_kind: IdKind,
    next_id: u64,
    rows: Vec<Map<String, Value>>,
}

impl Collection {
    fn new(id_kind: IdKind) -> Self {
        Self {
            id_kind,
            next_id: 1,
            rows: Vec::new(),
        }
    }

    fn insert(&mut self, mut row: Map<String, Value>) -> Map<String, Value> {
        let id = match row.get("id") {
            Some(id) if !id.is_null() => id.clone(),
            _ => match self.id_kind {
                IdKind::Text => Value::String(Uuid::new_v4().to_string()),
                IdKind::Number => Value::from(self.next_id),
            },
        };
        if let Some(n) = id.as_u64() {
            self.next_id = self.next_id.max(n + 1);
        }
        row.insert("id".to_string(), id);
        self.rows.push(row.clone());
        row
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.get("id").is_some_and(|v| id_matches(v, id)))
    }
}

fn id_matches(value: &Value, id: &str) -> bool {
    match value {
        Value::String(s) => s == id,
        Value::Number(n) => n.to_string() == id,
        _ => false,
    }
}

fn matches_query(row: &Map<String, Value>, needle: &str) -> bool {
    SEARCH_FIELDS.iter().any(|field| {
        row.get(*field)
            .and_then(Value::as_str)
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}

#[derive(Debug)]
pub struct Catalog {
    collections: HashMap<&'static str, Collection>,
}

impl Catalog {
    pub fn new() -> Self {
        let collections = COLLECTIONS
            .iter()
            .map(|(name, kind)| (*name, Collection::new(*kind)))
            .collect();
        Self { collections }
    }

    /// Build a catalog from `{"shops": [...], "products": [...], ...}`.
    /// Unknown keys and non-object rows are ignored.
    pub fn seeded(seed: &Value) -> Self {
        let mut catalog = Self::new();
        for (name, collection) in catalog.collections.iter_mut() {
            let rows = seed.get(*name).and_then(Value::as_array);
            for row in rows.into_iter().flatten() {
                if let Some(object) = row.as_object() {
                    collection.insert(object.clone());
                }
            }
        }
        catalog
    }

    // Blocks carry their shops inline.
    fn present(&self, name: &str, row: &Map<String, Value>) -> Value {
        let mut row = row.clone();
        if name == "blocks" {
            let shops: Vec<Value> = self
                .collections
                .get("shops")
                .map(|shops| {
                    shops
                        .rows
                        .iter()
                        .filter(|shop| shop.get("block_id") == row.get("id"))
                        .cloned()
                        .map(Value::Object)
                        .collect()
                })
                .unwrap_or_default();
            row.insert("shops".to_string(), Value::Array(shops));
        }
        Value::Object(row)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

pub type Db = Arc<RwLock<Catalog>>;

pub fn app() -> Router {
    app_with(Catalog::new())
}

pub fn app_with(catalog: Catalog) -> Router {
    let db: Db = Arc::new(RwLock::new(catalog));
    let api = Router::new()
        .route("/shops/{id}/products", get(products_by_shop))
        .route("/{collection}", get(list_rows).post(create_row))
        .route(
            "/{collection}/{id}",
            get(get_row).put(update_row).delete(delete_row),
        )
        .with_state(db);
    Router::new().nest(API_PREFIX, api)
}

pub async fn run(listener: TcpListener, catalog: Catalog) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(catalog)).await
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

fn unknown(collection: &str) -> Reply {
    failure(StatusCode::NOT_FOUND, format!("unknown collection {collection}"))
}

fn missing(collection: &str, id: &str) -> Reply {
    failure(StatusCode::NOT_FOUND, format!("{collection} {id} not found"))
}

async fn list_rows(
    State(db): State<Db>,
    Path(collection): Path<String>,
    Query(params): Query<SearchParams>,
) -> Reply {
    let catalog = db.read().await;
    let Some(rows) = catalog.collections.get(collection.as_str()) else {
        return unknown(&collection);
    };
    let needle = params
        .q
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());
    let data: Vec<Value> = rows
        .rows
        .iter()
        .filter(|row| needle.as_deref().map_or(true, |n| matches_query(row, n)))
        .map(|row| catalog.present(&collection, row))
        .collect();
    success(StatusCode::OK, "ok", Value::Array(data))
}

async fn get_row(State(db): State<Db>, Path((collection, id)): Path<(String, String)>) -> Reply {
    let catalog = db.read().await;
    let Some(rows) = catalog.collections.get(collection.as_str()) else {
        return unknown(&collection);
    };
    match rows.position(&id) {
        Some(index) => success(StatusCode::OK, "ok", catalog.present(&collection, &rows.rows[index])),
        None => missing(&collection, &id),
    }
}

async fn create_row(
    State(db): State<Db>,
    Path(collection): Path<String>,
    Json(input): Json<Value>,
) -> Reply {
    let Value::Object(row) = input else {
        return failure(StatusCode::UNPROCESSABLE_ENTITY, "expected a JSON object".to_string());
    };
    let mut catalog = db.write().await;
    let Some(rows) = catalog.collections.get_mut(collection.as_str()) else {
        return unknown(&collection);
    };
    let created = rows.insert(row);
    success(StatusCode::CREATED, "created", Value::Object(created))
}

async fn update_row(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, String)>,
    Json(input): Json<Value>,
) -> Reply {
    let Value::Object(changes) = input else {
        return failure(StatusCode::UNPROCESSABLE_ENTITY, "expected a JSON object".to_string());
    };
    let mut catalog = db.write().await;
    let Some(rows) = catalog.collections.get_mut(collection.as_str()) else {
        return unknown(&collection);
    };
    let Some(index) = rows.position(&id) else {
        return missing(&collection, &id);
    };
    let row = &mut rows.rows[index];
    for (key, value) in changes {
        if key != "id" {
            row.insert(key, value);
        }
    }
    success(StatusCode::OK, "updated", Value::Object(row.clone()))
}

async fn delete_row(State(db): State<Db>, Path((collection, id)): Path<(String, String)>) -> Reply {
    let mut catalog = db.write().await;
    let Some(rows) = catalog.collections.get_mut(collection.as_str()) else {
        return unknown(&collection);
    };
    match rows.position(&id) {
        Some(index) => {
            rows.rows.remove(index);
            success(StatusCode::OK, "deleted", Value::Null)
        }
        None => missing(&collection, &id),
    }
}

async fn products_by_shop(State(db): State<Db>, Path(shop_id): Path<String>) -> Reply {
    let catalog = db.read().await;
    let data: Vec<Value> = catalog
        .collections
        .get("products")
        .map(|products| {
            products
                .rows
                .iter()
                .filter(|row| row.get("shop_id").is_some_and(|v| id_matches(v, &shop_id)))
                .cloned()
                .map(Value::Object)
                .collect()
        })
        .unwrap_or_default();
    success(StatusCode::OK, "ok", Value::Array(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_collections_assign_increasing_ids() {
        let mut categories = Collection::new(IdKind::Number);
        let first = categories.insert(Map::new());
        let second = categories.insert(Map::new());
        assert_eq!(first["id"], 1);
        assert_eq!(second["id"], 2);
    }

    #[test]
    fn seeded_ids_advance_the_counter() {
        let mut catalog = Catalog::seeded(&json!({"blocks": [{"id": 5, "nama": "Blok E"}]}));
        let blocks = catalog.collections.get_mut("blocks").unwrap();
        assert_eq!(blocks.insert(Map::new())["id"], 6);
    }

    #[test]
    fn text_collections_assign_uuids() {
        let mut shops = Collection::new(IdKind::Text);
        let row = shops.insert(Map::new());
        assert!(Uuid::parse_str(row["id"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn ids_match_across_number_and_string() {
        assert!(id_matches(&json!(3), "3"));
        assert!(id_matches(&json!("s-1"), "s-1"));
        assert!(!id_matches(&json!(null), "null"));
    }

    #[test]
    fn query_matches_name_or_description_case_insensitively() {
        let row = json!({"nama": "Ayam Geprek", "description": "pedas"});
        let row = row.as_object().unwrap();
        assert!(matches_query(row, "ayam"));
        assert!(matches_query(row, "pedas"));
        assert!(!matches_query(row, "soto"));
    }

    #[test]
    fn blocks_embed_their_shops() {
        let catalog = Catalog::seeded(&json!({
            "blocks": [{"id": 1, "nama": "Blok A"}],
            "shops": [
                {"id": "s1", "nama": "Toko 1", "block_id": 1},
                {"id": "s2", "nama": "Toko 2", "block_id": 2}
            ]
        }));
        let block = &catalog.collections["blocks"].rows[0];
        let presented = catalog.present("blocks", block);
        assert_eq!(presented["shops"].as_array().unwrap().len(), 1);
    }
}
