//! Store configuration (data/store.yml)

use anyhow::{Context as _, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Exposed to templates as `site`
    pub site: SiteInfo,
    /// Exposed to templates as `seo`
    pub seo: SeoConfig,
    /// Directory layout and rendering options
    pub build: BuildConfig,
}

impl StoreConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let mut config: StoreConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config.site.normalize();
        Ok(config)
    }
}

/// Site identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub name: String,
    pub url: String,

    // Anything else (tagline, currency, ...) is passed through to templates
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl SiteInfo {
    /// Drop trailing slashes so templates can append `/path` to `url`
    pub fn normalize(&mut self) {
        let trimmed = self.url.trim_end_matches('/').len();
        self.url.truncate(trimmed);
    }
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "My Store".to_string(),
            url: "http://example.com".to_string(),
            extra: IndexMap::new(),
        }
    }
}

/// Search engine metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    pub description: String,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// Build settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub template_dir: String,
    pub output_dir: String,
    pub static_dir: String,
    /// Escape interpolated values unless marked `|safe`
    pub autoescape: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            template_dir: "templates".to_string(),
            output_dir: "out".to_string(),
            static_dir: "static".to_string(),
            autoescape: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.site.name, "My Store");
        assert_eq!(config.build.output_dir, "out");
        assert!(config.build.autoescape);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
site:
  name: Corner Shop
  url: https://shop.example
  tagline: Things we like
seo:
  description: Small things, carefully chosen
build:
  output_dir: public
"#;
        let config: StoreConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.site.name, "Corner Shop");
        assert_eq!(config.site.url, "https://shop.example");
        assert_eq!(
            config.site.extra.get("tagline").and_then(|v| v.as_str()),
            Some("Things we like")
        );
        assert_eq!(config.seo.description, "Small things, carefully chosen");
        assert_eq!(config.build.output_dir, "public");
        assert_eq!(config.build.template_dir, "templates");
    }

    #[test]
    fn test_load_trims_trailing_slash() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.yml");
        fs::write(&path, "site:\n  name: A\n  url: https://a.example//\n").unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config.site.url, "https://a.example");
    }

    #[test]
    fn test_site_serializes_flat() {
        let yaml = "site:\n  name: A\n  url: https://a\n  currency: EUR\n";
        let config: StoreConfig = serde_yaml::from_str(yaml).unwrap();
        let json = serde_json::to_value(&config.site).unwrap();
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["name"], "A");
    }
}
