//! Initialize a new store site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::theme::ThemeLoader;
use crate::CONFIG_FILE;

const STORE_CONFIG: &str = r#"# storegen configuration

site:
  name: My Store
  url: http://example.com

seo:
  description: Hand-picked goods, shipped from a small workshop.

build:
  template_dir: templates
  output_dir: out
  static_dir: static
  autoescape: true
"#;

const SAMPLE_PRODUCTS: &str = "\
sku,title,description,price,thumbnail_url,product_url,tags,status,publish_date
MUG-01,Stoneware Mug,Hand-thrown mug with a matte glaze.,18,/img/mug.jpg,https://example.com/buy/mug,\"kitchen,ceramics\",active,2024-01-01
TEA-02,Loose Leaf Sampler,Six small tins of seasonal tea.,24.5,/img/tea.jpg,https://example.com/buy/tea,\"tea,gift\",active,2024-01-15
";

const SAMPLE_POSTS: &str = "\
slug,title,summary,tags,status,publish_date,body_markdown
hello-world,Hello World,Our shop is open.,news,active,2024-01-01,\"# Hello World

Welcome to the shop. This month we are stocking:

- mugs
- tea

```
storegen build
```\"
";

const SAMPLE_FEEDS: &str = r#"{
  "sources": [
    {
      "url": "data/supplier.json",
      "type": "json",
      "status": "paused",
      "default_publish_date": "today",
      "mapping": {
        "sku": "id",
        "title": "name",
        "description": "details.summary",
        "price": "pricing.amount",
        "thumbnail_url": "images.thumb",
        "product_url": "link",
        "tags": "labels"
      }
    }
  ]
}
"#;

const SAMPLE_STYLE: &str = "body { font-family: sans-serif; max-width: 48rem; margin: 0 auto; }\n";

/// Initialize a new site in the given directory, keeping existing files
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("data"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    write_if_missing(&target_dir.join(CONFIG_FILE), STORE_CONFIG)?;
    write_if_missing(&target_dir.join("data/products.csv"), SAMPLE_PRODUCTS)?;
    write_if_missing(&target_dir.join("data/posts.csv"), SAMPLE_POSTS)?;
    write_if_missing(&target_dir.join("data/feeds.json"), SAMPLE_FEEDS)?;
    write_if_missing(&target_dir.join("static/style.css"), SAMPLE_STYLE)?;

    let written = ThemeLoader::new(target_dir.join("templates")).write_builtins()?;
    tracing::debug!("Wrote {} templates", written);

    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        tracing::info!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, contents)?;
    Ok(())
}
