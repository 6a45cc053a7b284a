//! Remote catalog client.
//!
//! One GET against the listing endpoint, bounded by a timeout. The catalog
//! is optional input: every failure degrades to an empty list so static and
//! category routes still generate.

use crate::config::CatalogConfig;
use crate::utils::date::DateUtc;
use crate::{debug, log};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Item identifier as the backend sends it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Num(i64),
    Str(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// One catalog record. Only `name` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub id: Option<ItemId>,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Social image override
    #[serde(default)]
    pub og_image: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Hand-written JSON-LD, replaces the generated product block
    #[serde(default)]
    pub schema_json: Option<String>,
}

impl CatalogItem {
    /// Trimmed, non-empty slug.
    pub fn slug(&self) -> Option<&str> {
        self.slug
            .as_deref()
            .map(|s| s.trim().trim_matches('/'))
            .filter(|s| !s.is_empty())
    }

    /// Trimmed, non-empty category key.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    /// Label for log lines: id when present, otherwise the name.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("#{} ({})", id, self.name),
            None => self.name.clone(),
        }
    }

    pub fn lastmod(&self) -> Option<DateUtc> {
        self.updated_at.as_deref().and_then(DateUtc::parse)
    }

    /// `true` unless the backend says otherwise.
    pub fn available(&self) -> bool {
        self.is_available.unwrap_or(true)
    }

    /// Hand-written structured data, if it parses.
    pub fn custom_schema(&self) -> Option<Value> {
        let raw = self.schema_json.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
            Ok(_) | Err(_) => {
                log!("warn"; "item {}: schema_json is not a JSON object, using generated data", self.label());
                None
            }
        }
    }
}

/// Fetch all catalog items, or an empty list when the catalog is off or
/// unreachable.
pub async fn fetch_catalog(config: &CatalogConfig) -> Vec<CatalogItem> {
    let Some(url) = config.endpoint() else {
        debug!("catalog"; "catalog fetch disabled");
        return Vec::new();
    };

    log!("catalog"; "fetching {}", url);
    match fetch_items(url, config).await {
        Ok(items) => {
            log!("catalog"; "{}", crate::utils::plural_count(items.len(), "item"));
            items
        }
        Err(e) => {
            log!("warn"; "catalog unavailable, continuing without items: {:#}", e);
            Vec::new()
        }
    }
}

async fn fetch_items(url: &str, config: &CatalogConfig) -> Result<Vec<CatalogItem>> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(url)
        .query(&[("limit", config.page_size)])
        .send()
        .await
        .context("request failed")?
        .error_for_status()
        .context("catalog returned an error status")?;

    let records: Vec<Value> = response
        .json()
        .await
        .context("response body is not a JSON array")?;

    Ok(decode_records(records))
}

/// Decode records one by one; malformed records are skipped.
pub fn decode_records(records: Vec<Value>) -> Vec<CatalogItem> {
    let total = records.len();
    let items: Vec<CatalogItem> = records
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| match serde_json::from_value(record) {
            Ok(item) => Some(item),
            Err(e) => {
                log!("warn"; "catalog record {} skipped: {}", idx, e);
                None
            }
        })
        .collect();

    if items.len() < total {
        debug!("catalog"; "decoded {}/{} records", items.len(), total);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_record() {
        let items = decode_records(vec![json!({
            "id": 7,
            "name": "Choco Dream",
            "category": "bento",
            "slug": "choco-dream",
            "price": 650.0,
            "is_available": false,
            "updated_at": "2024-06-15T14:30:45.123456"
        })]);

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id, Some(ItemId::Num(7)));
        assert_eq!(item.slug(), Some("choco-dream"));
        assert_eq!(item.category(), Some("bento"));
        assert!(!item.available());
        assert_eq!(item.lastmod(), Some(DateUtc::from_ymd(2024, 6, 15)));
        assert_eq!(item.label(), "#7 (Choco Dream)");
    }

    #[test]
    fn test_decode_skips_bad_records() {
        let items = decode_records(vec![
            json!({ "name": "Ok" }),
            json!({ "slug": "no-name" }),
            json!("not an object"),
            json!({ "name": "Price as text", "price": "cheap" }),
            json!({ "name": "Also ok", "id": "abc" }),
        ]);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Ok", "Also ok"]);
        assert_eq!(items[1].id, Some(ItemId::Str("abc".into())));
    }

    #[test]
    fn test_blank_slug_and_category_are_none() {
        let items = decode_records(vec![json!({
            "name": "Blank",
            "slug": "   ",
            "category": ""
        })]);
        assert_eq!(items[0].slug(), None);
        assert_eq!(items[0].category(), None);
        assert!(items[0].available());
    }

    #[test]
    fn test_custom_schema() {
        let items = decode_records(vec![
            json!({ "name": "A", "schema_json": "{\"@type\": \"Product\", \"name\": \"A\"}" }),
            json!({ "name": "B", "schema_json": "not json" }),
            json!({ "name": "C", "schema_json": "42" }),
        ]);
        assert_eq!(items[0].custom_schema().unwrap()["@type"], "Product");
        assert!(items[1].custom_schema().is_none());
        assert!(items[2].custom_schema().is_none());
    }

    #[tokio::test]
    async fn test_fetch_disabled_returns_empty() {
        let config = CatalogConfig {
            enable: false,
            url: Some("http://127.0.0.1:9/cakes/".into()),
            ..CatalogConfig::default()
        };
        assert!(fetch_catalog(&config).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_degrades_to_empty() {
        let config = CatalogConfig {
            url: Some("http://127.0.0.1:9/cakes/".into()),
            timeout_secs: 2,
            ..CatalogConfig::default()
        };
        assert!(fetch_catalog(&config).await.is_empty());
    }
}
