//! storegen: a static storefront and blog generator
//!
//! Products and posts are read from CSV files, rendered through a small
//! template language (`{{ expr }}` and `{% for %}` blocks) and written out
//! as static HTML pages, an RSS feed and a sitemap.

pub mod commands;
pub mod config;
pub mod content;
pub mod feeds;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod template;
pub mod theme;

use anyhow::Result;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub use generator::BuildSummary;

/// Site configuration file, relative to the base directory
pub const CONFIG_FILE: &str = "data/store.yml";

/// A store site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Store {
    /// Store configuration
    pub config: config::StoreConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Record files and feed configuration
    pub data_dir: PathBuf,
    /// Site templates
    pub template_dir: PathBuf,
    /// Assets copied verbatim into the output
    pub static_dir: PathBuf,
    /// Generated site
    pub output_dir: PathBuf,
}

impl Store {
    /// Open a store directory, using default settings when it has no config
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::StoreConfig::load(&config_path)?
        } else {
            config::StoreConfig::default()
        };

        let data_dir = base_dir.join("data");
        let template_dir = base_dir.join(&config.build.template_dir);
        let static_dir = base_dir.join(&config.build.static_dir);
        let output_dir = base_dir.join(&config.build.output_dir);

        Ok(Self {
            config,
            base_dir,
            data_dir,
            template_dir,
            static_dir,
            output_dir,
        })
    }

    pub fn feeds_path(&self) -> PathBuf {
        self.data_dir.join("feeds.json")
    }

    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join("products.csv")
    }

    /// Loader for the publishable records as of `today`
    pub fn loader(&self, today: NaiveDate) -> content::ContentLoader {
        content::ContentLoader::new(&self.data_dir, today)
    }

    /// Build the site as of `today`
    pub fn build(&self, today: NaiveDate) -> Result<BuildSummary> {
        commands::build::run(self, today)
    }

    /// Remove the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
