//! Configuration module

mod feeds;
mod site;

pub use feeds::{FeedSource, FeedsConfig};
pub use site::{BuildConfig, SeoConfig, SiteInfo, StoreConfig};
