//! Product feed sources (data/feeds.json)

use anyhow::{Context as _, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// List of feeds pulled by `storegen fetch`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub sources: Vec<FeedSource>,
}

impl FeedsConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read feeds {:?}", path))?;
        let config: FeedsConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse feeds {:?}", path))?;
        Ok(config)
    }
}

/// One remote or local feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSource {
    /// `http(s)://` URL, or a path relative to the site directory
    pub url: String,

    /// `json` or `csv`
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,

    /// Output column -> dotted path into each feed item
    pub mapping: IndexMap<String, String>,

    #[serde(default = "default_status")]
    pub status: String,

    /// `today`, an ISO date, or absent for the epoch
    #[serde(default)]
    pub default_publish_date: Option<String>,
}

impl FeedSource {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

fn default_kind() -> String {
    "json".to_string()
}

fn default_status() -> String {
    "active".to_string()
}
