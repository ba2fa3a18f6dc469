//! Blog post records

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use super::markdown;
use super::Row;
use crate::helpers::{date_iso, date_rfc822, publish_date, split_tags};

const KNOWN_COLUMNS: &[&str] = &[
    "slug",
    "title",
    "summary",
    "tags",
    "status",
    "publish_date",
    "date",
    "rfc822",
    "body_markdown",
    "body_html",
];

/// A blog post, as exposed to templates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub status: String,
    pub publish_date: String,

    /// Publish date as `YYYY-MM-DD`
    pub date: String,

    /// Publish date for RSS
    pub rfc822: String,

    pub body_markdown: String,

    /// Rendered body; interpolate with `|safe`
    pub body_html: String,

    #[serde(skip)]
    pub published_on: NaiveDate,

    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

impl Post {
    /// Normalize a raw CSV row and render its Markdown body
    pub fn from_row(row: &Row, today: NaiveDate) -> Self {
        let field = |name: &str| row.get(name).cloned().unwrap_or_default();

        let title = field("title");
        let slug = match row.get("slug").map(|s| s.trim()) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => slug::slugify(&title),
        };
        let published_on = publish_date(row.get("publish_date").map(String::as_str), today);
        let body_markdown = field("body_markdown");

        let extra = row
            .iter()
            .filter(|(k, _)| !KNOWN_COLUMNS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            summary: field("summary"),
            tags: split_tags(&field("tags")),
            status: row
                .get("status")
                .cloned()
                .unwrap_or_else(|| "active".to_string()),
            publish_date: field("publish_date"),
            date: date_iso(published_on),
            rfc822: date_rfc822(published_on),
            body_html: markdown::to_html(&body_markdown),
            body_markdown,
            title,
            slug,
            published_on,
            extra,
        }
    }

    pub fn is_publishable(&self, today: NaiveDate) -> bool {
        self.status == "active" && self.published_on <= today
    }
}
