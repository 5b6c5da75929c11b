//! Catalog entities as the backend serves them.
//!
//! # Design
//! The backend speaks Indonesian field names (`nama`, `harga`, `foto`, ...);
//! the Rust side uses English names and maps them with `#[serde(rename)]`.
//! These are read-only mirrors: the frontend never owns authoritative state.
//!
//! Every entity has a matching `*Input` type where all fields are optional
//! and only the present ones are serialized. The same payload is used for
//! create (POST) and update (PUT).

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// A backend collection that supports the standard list/get/create/update/
/// delete routes under `PATH`.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Id: fmt::Display + fmt::Debug + PartialEq + Clone + Send + Sync + 'static;
    type Input: Serialize + Send + Sync + 'static;

    /// Collection path relative to the API base, e.g. `/products`.
    const PATH: &'static str;
    /// Singular name used in log lines and not-found messages.
    const NAME: &'static str;

    fn id(&self) -> &Self::Id;
}

// Some rows come back with numeric ids where the schema says string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}

/// Parse the datetime formats the backend has been seen to emit.
///
/// RFC 3339 first; naive forms are read as UTC.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: [&str; 6] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// A product sold by a shop. `price` is in rupiah (no minor unit).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "harga")]
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "foto", default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub category_id: u64,
    #[serde(deserialize_with = "string_or_number")]
    pub shop_id: String,
    #[serde(rename = "stok", default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(rename = "nama", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "harga", skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "foto", skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,
    #[serde(rename = "stok", skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl Resource for Product {
    type Id = String;
    type Input = ProductInput;
    const PATH: &'static str = "/products";
    const NAME: &'static str = "product";

    fn id(&self) -> &String {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Shop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shop {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "pemilik")]
    pub owner: String,
    #[serde(rename = "alamat")]
    pub address: String,
    pub block_id: u64,
    #[serde(rename = "foto", default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(rename = "deskripsi", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopInput {
    #[serde(rename = "nama", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "pemilik", skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(rename = "alamat", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<u64>,
    #[serde(rename = "foto", skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(rename = "deskripsi", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for Shop {
    type Id = String;
    type Input = ShopInput;
    const PATH: &'static str = "/shops";
    const NAME: &'static str = "shop";

    fn id(&self) -> &String {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "deskripsi", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryInput {
    #[serde(rename = "nama", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "deskripsi", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for Category {
    type Id = u64;
    type Input = CategoryInput;
    const PATH: &'static str = "/categories";
    const NAME: &'static str = "category";

    fn id(&self) -> &u64 {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A housing block. The detail endpoint embeds the block's shops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub id: u64,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "deskripsi", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shops: Option<Vec<Shop>>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockInput {
    #[serde(rename = "nama", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "deskripsi", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for Block {
    type Id = u64;
    type Input = BlockInput;
    const PATH: &'static str = "/blocks";
    const NAME: &'static str = "block";

    fn id(&self) -> &u64 {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// HouseNumber
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HouseNumber {
    pub id: u64,
    #[serde(rename = "nomor")]
    pub number: String,
    pub block_id: u64,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HouseNumberInput {
    #[serde(rename = "nomor", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<u64>,
}

impl Resource for HouseNumber {
    type Id = u64;
    type Input = HouseNumberInput;
    const PATH: &'static str = "/house-numbers";
    const NAME: &'static str = "house number";

    fn id(&self) -> &u64 {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

/// A community activity. `scheduled_at` is kept as the raw wire string;
/// use [`Activity::scheduled_time`] for comparisons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Activity {
    pub id: u64,
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "deskripsi", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "waktu_pelaksanaan")]
    pub scheduled_at: String,
    #[serde(rename = "peserta")]
    pub participants: String,
    #[serde(rename = "lokasi", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "foto", default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Activity {
    /// `None` when `scheduled_at` does not parse.
    pub fn scheduled_time(&self) -> Option<DateTime<Utc>> {
        parse_datetime(&self.scheduled_at)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityInput {
    #[serde(rename = "nama", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "deskripsi", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "waktu_pelaksanaan", skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<String>,
    #[serde(rename = "peserta", skip_serializing_if = "Option::is_none")]
    pub participants: Option<String>,
    #[serde(rename = "lokasi", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "foto", skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Resource for Activity {
    type Id = u64;
    type Input = ActivityInput;
    const PATH: &'static str = "/activities";
    const NAME: &'static str = "activity";

    fn id(&self) -> &u64 {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn product_reads_indonesian_field_names() {
        let json = r#"{"id":"p1","nama":"Nasi Ayam","harga":15000,"foto":"nasi.jpg",
            "category_id":2,"shop_id":"s1","stok":4,"createdAt":"2024-01-01T00:00:00Z"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.name, "Nasi Ayam");
        assert_eq!(product.price, 15000);
        assert_eq!(product.photo.as_deref(), Some("nasi.jpg"));
        assert_eq!(product.stock, Some(4));
        assert!(product.description.is_none());
    }

    #[test]
    fn string_ids_accept_numbers() {
        let json = r#"{"id":12,"nama":"Kopi","harga":8000,"category_id":1,"shop_id":7}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, "12");
        assert_eq!(product.shop_id, "7");
    }

    #[test]
    fn input_serializes_only_present_fields() {
        let input = ShopInput {
            name: Some("Warung Bu Sri".to_string()),
            block_id: Some(3),
            ..Default::default()
        };
        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(body, serde_json::json!({"nama": "Warung Bu Sri", "block_id": 3}));
    }

    #[test]
    fn block_embeds_shops() {
        let json = r#"{"id":1,"nama":"Blok A","shops":[
            {"id":"s1","nama":"Toko 1","pemilik":"Andi","alamat":"A-1","block_id":1}]}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.shops.unwrap()[0].owner, "Andi");
    }

    #[test]
    fn activity_parses_common_datetime_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 8, 17, 7, 0, 0).unwrap();
        for raw in [
            "2024-08-17T07:00:00Z",
            "2024-08-17T07:00:00.000Z",
            "2024-08-17T14:00:00+07:00",
            "2024-08-17 07:00:00",
            "2024-08-17T07:00",
        ] {
            assert_eq!(parse_datetime(raw), Some(expected), "{raw}");
        }
        assert_eq!(
            parse_datetime("2024-08-17"),
            Some(Utc.with_ymd_and_hms(2024, 8, 17, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_datetime("besok pagi"), None);
    }
}
