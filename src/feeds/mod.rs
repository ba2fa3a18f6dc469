//! Feeds module - pulls product feeds into data/products.csv

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{FeedSource, FeedsConfig};
use crate::content::loader::parse_rows;
use crate::content::Row;
use crate::helpers::{date_iso, fallback_sku, format_price, format_price_value, EPOCH_DATE};

/// Columns of the generated products file
pub const PRODUCT_HEADER: &[&str] = &[
    "sku",
    "title",
    "description",
    "price",
    "thumbnail_url",
    "product_url",
    "tags",
    "status",
    "publish_date",
];

/// Feed formats understood by [`parse_items`]
pub const FEED_TYPES: &[&str] = &["json", "csv"];

const TIMEOUT_SECONDS: u64 = 25;
const USER_AGENT: &str = "Mozilla/5.0";

/// Fetches and normalizes every active feed source
pub struct FeedFetcher {
    client: reqwest::Client,
    /// Local feed paths are resolved against this directory
    base_dir: PathBuf,
    today: NaiveDate,
}

impl FeedFetcher {
    pub fn new<P: AsRef<Path>>(base_dir: P, today: NaiveDate) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .user_agent(USER_AGENT)
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_dir: base_dir.as_ref().to_path_buf(),
            today,
        })
    }

    /// Fetch all sources in order and return the normalized rows
    pub async fn fetch_all(&self, config: &FeedsConfig) -> Result<Vec<Row>> {
        let mut rows = Vec::new();

        for source in &config.sources {
            if !source.is_active() {
                tracing::debug!("Skipping inactive feed {}", source.url);
                continue;
            }

            if !FEED_TYPES.contains(&source.kind.as_str()) {
                tracing::warn!("Unknown feed type: {}; skipping {}", source.kind, source.url);
                continue;
            }

            let raw = self.fetch_source(&source.url).await?;
            let items = parse_items(&source.kind, &raw)
                .with_context(|| format!("Failed to parse feed {}", source.url))?
                .unwrap_or_default();

            tracing::info!("Fetched {} items from {}", items.len(), source.url);
            for item in &items {
                let mut row = normalize_item(item, &source.mapping);
                apply_defaults(&mut row, source, self.today);
                rows.push(row);
            }
        }

        Ok(rows)
    }

    /// Read a feed body from an HTTP(S) URL or a local file
    async fn fetch_source(&self, url: &str) -> Result<Vec<u8>> {
        if url.starts_with("http://") || url.starts_with("https://") {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .with_context(|| format!("Failed to fetch {}", url))?
                .error_for_status()
                .with_context(|| format!("Feed {} returned an error status", url))?;
            let bytes = response
                .bytes()
                .await
                .with_context(|| format!("Failed to read body of {}", url))?;
            return Ok(bytes.to_vec());
        }

        let path = self.base_dir.join(url);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read feed {:?}", path))
    }
}

/// Decode a feed body into items.
///
/// JSON feeds are an array of items or an object with an `items` array.
/// Returns `None` for an unsupported feed type.
pub fn parse_items(kind: &str, raw: &[u8]) -> Result<Option<Vec<JsonValue>>> {
    match kind {
        "json" => {
            let data: JsonValue = serde_json::from_slice(raw)?;
            let items = match data {
                JsonValue::Array(items) => items,
                JsonValue::Object(mut obj) => match obj.remove("items") {
                    Some(JsonValue::Array(items)) => items,
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            };
            Ok(Some(items))
        }
        "csv" => {
            let text = String::from_utf8_lossy(raw);
            let items = parse_rows(&text)
                .into_iter()
                .map(|row| {
                    JsonValue::Object(
                        row.into_iter()
                            .map(|(k, v)| (k, JsonValue::String(v)))
                            .collect(),
                    )
                })
                .collect();
            Ok(Some(items))
        }
        _ => Ok(None),
    }
}

/// Map one feed item onto output columns.
///
/// Each mapping value is a dotted path into the item; a path that leaves
/// the object tree yields an empty field.
pub fn normalize_item(item: &JsonValue, mapping: &indexmap::IndexMap<String, String>) -> Row {
    let mut row = Row::new();

    for (out_field, in_path) in mapping {
        let value = in_path
            .split('.')
            .try_fold(item, |current, part| current.as_object()?.get(part));

        let field = match (out_field.as_str(), value) {
            ("price", Some(JsonValue::Number(n))) => {
                format_price_value(n.as_f64().unwrap_or(f64::NAN))
            }
            ("price", Some(other)) => format_price(&scalar_string(other)),
            ("price", None) => format_price(""),
            ("tags", Some(JsonValue::Array(tags))) => tags
                .iter()
                .map(scalar_string)
                .collect::<Vec<_>>()
                .join(","),
            (_, Some(other)) => scalar_string(other),
            (_, None) => String::new(),
        };
        row.insert(out_field.clone(), field);
    }

    row
}

/// Fill columns the feed left out.
///
/// `status` and `publish_date` are only added when unmapped; a mapped but
/// empty value is kept. An empty `sku` is always replaced.
pub fn apply_defaults(row: &mut Row, source: &FeedSource, today: NaiveDate) {
    row.entry("status".to_string())
        .or_insert_with(|| "active".to_string());

    row.entry("publish_date".to_string())
        .or_insert_with(|| match source.default_publish_date.as_deref() {
            Some("today") => date_iso(today),
            Some(date) => date.to_string(),
            None => EPOCH_DATE.to_string(),
        });

    if row.get("sku").map_or(true, |s| s.is_empty()) {
        let title = row.get("title").map(String::as_str).unwrap_or_default();
        let sku = fallback_sku(title);
        row.insert("sku".to_string(), sku);
    }
}

/// Write rows under the fixed product header; unknown columns are dropped
pub fn write_products_csv(path: &Path, rows: &[Row]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;
    writer.write_record(PRODUCT_HEADER)?;
    for row in rows {
        writer.write_record(
            PRODUCT_HEADER
                .iter()
                .map(|column| row.get(*column).map(String::as_str).unwrap_or_default()),
        )?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} products -> {:?}", rows.len(), path);
    Ok(())
}

fn scalar_string(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
