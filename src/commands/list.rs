//! List publishable records

use anyhow::Result;
use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::content::{Post, Product};
use crate::Store;

/// List records by type
pub fn run(store: &Store, content_type: &str, today: NaiveDate) -> Result<()> {
    let loader = store.loader(today);

    match content_type {
        "product" | "products" => {
            let products = loader.load_products()?;
            println!("Products ({}):", products.len());
            for product in products {
                println!(
                    "  {} - {} [{}] {}",
                    product.sku, product.title, product.price, product.slug
                );
            }
        }
        "post" | "posts" => {
            let posts = loader.load_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!("  {} - {} [{}]", post.date, post.title, post.slug);
            }
        }
        "tag" | "tags" => {
            let products = loader.load_products()?;
            let posts = loader.load_posts()?;
            let tags = count_tags(&products, &posts);
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: products, posts, tags",
                content_type
            );
        }
    }

    Ok(())
}

/// Tag usage across products and posts, most used first; ties keep first-seen order
pub fn count_tags(products: &[Product], posts: &[Post]) -> Vec<(String, usize)> {
    let mut tags: IndexMap<String, usize> = IndexMap::new();
    let all = products
        .iter()
        .flat_map(|p| p.tags.iter())
        .chain(posts.iter().flat_map(|p| p.tags.iter()));
    for tag in all {
        *tags.entry(tag.clone()).or_insert(0) += 1;
    }

    let mut tags: Vec<_> = tags.into_iter().collect();
    tags.sort_by(|a, b| b.1.cmp(&a.1));
    tags
}
