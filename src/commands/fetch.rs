//! Pull product feeds into data/products.csv

use anyhow::Result;
use chrono::NaiveDate;

use crate::config::FeedsConfig;
use crate::feeds::{write_products_csv, FeedFetcher};
use crate::Store;

/// Fetch every active feed and overwrite the products file.
///
/// Returns the number of products written.
pub async fn run(store: &Store, today: NaiveDate) -> Result<usize> {
    let config = FeedsConfig::load(store.feeds_path())?;
    tracing::info!("Fetching {} feed sources", config.sources.len());

    let fetcher = FeedFetcher::new(&store.base_dir, today)?;
    let rows = fetcher.fetch_all(&config).await?;

    write_products_csv(&store.products_path(), &rows)?;
    Ok(rows.len())
}
