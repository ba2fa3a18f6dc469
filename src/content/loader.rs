//! Content loader - reads product and post records from CSV files

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use super::{Post, Product};

/// One CSV record, keyed by header, in column order
pub type Row = IndexMap<String, String>;

/// Loads records from the data directory
pub struct ContentLoader {
    data_dir: PathBuf,
    today: NaiveDate,
}

impl ContentLoader {
    /// Create a loader that treats `today` as the publishing cut-off
    pub fn new<P: AsRef<Path>>(data_dir: P, today: NaiveDate) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            today,
        }
    }

    /// Load publishable products from data/products.csv, in file order
    pub fn load_products(&self) -> Result<Vec<Product>> {
        let rows = read_rows(&self.data_dir.join("products.csv"))?;
        let total = rows.len();

        let products: Vec<Product> = rows
            .iter()
            .map(|row| Product::from_row(row, self.today))
            .filter(|p| p.is_publishable(self.today))
            .collect();

        tracing::debug!(
            "Loaded {} of {} products ({} unpublished)",
            products.len(),
            total,
            total - products.len()
        );
        Ok(products)
    }

    /// Load publishable posts from data/posts.csv, in file order
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let rows = read_rows(&self.data_dir.join("posts.csv"))?;
        let total = rows.len();

        let posts: Vec<Post> = rows
            .iter()
            .filter_map(|row| {
                let post = Post::from_row(row, self.today);
                post.is_publishable(self.today).then_some(post)
            })
            .collect();

        tracing::debug!("Loaded {} of {} posts", posts.len(), total);
        Ok(posts)
    }
}

/// Read every record of a CSV file with a header row.
///
/// A missing file yields no records. Rows that fail to decode are logged
/// and skipped.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    if !path.exists() {
        tracing::warn!("No records file at {:?}", path);
        return Ok(Vec::new());
    }

    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {:?}", path))?;
    Ok(decode_rows(reader, &path.display().to_string()))
}

/// Read records from CSV text with a header row
pub fn parse_rows(text: &str) -> Vec<Row> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    decode_rows(reader, "<feed>")
}

fn decode_rows<R: std::io::Read>(mut reader: csv::Reader<R>, origin: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<Row>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                tracing::warn!("Skipping record {} of {}: {}", index + 1, origin, e);
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_parse_rows_keeps_column_order() {
        let rows = parse_rows("sku,title,price\nA1,\"Mug, blue\",5\n");
        assert_eq!(rows.len(), 1);
        let keys: Vec<_> = rows[0].keys().cloned().collect();
        assert_eq!(keys, vec!["sku", "title", "price"]);
        assert_eq!(rows[0]["title"], "Mug, blue");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ContentLoader::new(dir.path(), today());
        assert!(loader.load_products().unwrap().is_empty());
        assert!(loader.load_posts().unwrap().is_empty());
    }

    #[test]
    fn test_load_filters_unpublishable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("products.csv"),
            "sku,title,price,status,publish_date\n\
             A,Alpha,1,active,2024-01-01\n\
             B,Beta,2,archived,2024-01-01\n\
             C,Gamma,3,active,2099-01-01\n\
             D,Delta,4,active,\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("posts.csv"),
            "slug,title,summary,status,publish_date,body_markdown\n\
             one,One,S1,active,2024-05-01,Hi\n\
             two,Two,S2,active,2024-07-01,Later\n",
        )
        .unwrap();

        let loader = ContentLoader::new(dir.path(), today());
        let products = loader.load_products().unwrap();
        let skus: Vec<_> = products.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["A", "D"]);

        let posts = loader.load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].body_html, "<p>Hi</p>");
    }
}
