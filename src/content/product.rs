//! Product records

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use super::Row;
use crate::helpers::{format_price, product_slug, publish_date, split_tags};

/// Columns with dedicated fields; everything else lands in `extra`
const KNOWN_COLUMNS: &[&str] = &[
    "sku",
    "title",
    "description",
    "price",
    "thumbnail_url",
    "product_url",
    "tags",
    "status",
    "publish_date",
    "slug",
];

/// A product, as exposed to templates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub sku: String,
    pub title: String,
    pub description: String,

    /// Fixed-point string with two decimals
    pub price: String,

    pub thumbnail_url: String,
    pub product_url: String,
    pub tags: Vec<String>,
    pub status: String,

    /// Raw value from the record
    pub publish_date: String,

    /// URL-friendly name, `products/<slug>.html`
    pub slug: String,

    /// Resolved publish date
    #[serde(skip)]
    pub published_on: NaiveDate,

    /// Additional CSV columns
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

impl Product {
    /// Normalize a raw CSV row
    pub fn from_row(row: &Row, today: NaiveDate) -> Self {
        let field = |name: &str| row.get(name).cloned().unwrap_or_default();

        let sku = field("sku");
        let title = field("title");
        let slug = product_slug(&sku, &title);
        let published_on = publish_date(row.get("publish_date").map(String::as_str), today);

        let extra = row
            .iter()
            .filter(|(k, _)| !KNOWN_COLUMNS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            description: field("description"),
            price: format_price(row.get("price").map(String::as_str).unwrap_or("0")),
            thumbnail_url: field("thumbnail_url"),
            product_url: field("product_url"),
            tags: split_tags(&field("tags")),
            status: row
                .get("status")
                .cloned()
                .unwrap_or_else(|| "active".to_string()),
            publish_date: field("publish_date"),
            sku,
            title,
            slug,
            published_on,
            extra,
        }
    }

    /// Active and not scheduled for the future
    pub fn is_publishable(&self, today: NaiveDate) -> bool {
        self.status == "active" && self.published_on <= today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_from_row() {
        let product = Product::from_row(
            &row(&[
                ("sku", "MUG-1"),
                ("title", "Blue Mug"),
                ("price", "12.5"),
                ("tags", "kitchen, blue"),
                ("publish_date", "2024-05-01"),
                ("color", "blue"),
            ]),
            today(),
        );
        assert_eq!(product.slug, "mug-1-blue-mug");
        assert_eq!(product.price, "12.50");
        assert_eq!(product.tags, vec!["kitchen", "blue"]);
        assert_eq!(product.status, "active");
        assert_eq!(product.extra.get("color").map(String::as_str), Some("blue"));
        assert!(product.is_publishable(today()));
    }

    #[test]
    fn test_publishability() {
        let future = Product::from_row(&row(&[("title", "Soon"), ("publish_date", "2030-01-01")]), today());
        assert!(!future.is_publishable(today()));

        let draft = Product::from_row(&row(&[("title", "Draft"), ("status", "draft")]), today());
        assert!(!draft.is_publishable(today()));

        let undated = Product::from_row(&row(&[("title", "Old")]), today());
        assert!(undated.is_publishable(today()));

        let bad_date = Product::from_row(&row(&[("title", "Typo"), ("publish_date", "soon")]), today());
        assert_eq!(bad_date.published_on, today());
        assert!(bad_date.is_publishable(today()));
    }

    #[test]
    fn test_serializes_extra_fields_flat() {
        let product = Product::from_row(&row(&[("title", "Tee"), ("size", "M")]), today());
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["size"], "M");
        assert_eq!(json["tags"], serde_json::json!([]));
        assert!(json.get("published_on").is_none());
    }
}
