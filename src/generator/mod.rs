//! Generator module - assembles contexts and writes every output page

use anyhow::{Context as _, Result};
use chrono::{Datelike, NaiveDate};
use std::fs;
use std::path::Path;

use crate::content::{Post, Product};
use crate::helpers::{full_url_for, post_path, product_path};
use crate::template::{Context, TemplateEngine};
use crate::theme::{self, copy_static, ThemeLoader};
use crate::Store;

const HOME_PATH: &str = "index.html";
const PRODUCTS_INDEX_PATH: &str = "products/index.html";
const BLOG_INDEX_PATH: &str = "blog/index.html";

const HOME_TITLE: &str = "Home";
const PRODUCTS_INDEX_TITLE: &str = "Products";
const PRODUCTS_INDEX_DESCRIPTION: &str = "Browse all products";
const BLOG_INDEX_TITLE: &str = "Blog";
const BLOG_INDEX_DESCRIPTION: &str = "News and updates";

/// Counts reported after a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub products: usize,
    pub posts: usize,
    pub pages: usize,
    pub assets: usize,
}

/// Static site generator
pub struct Generator {
    store: Store,
    engine: TemplateEngine,
    today: NaiveDate,
}

/// One page wrapped by the base template
struct PageMeta<'a> {
    path: &'a str,
    title: &'a str,
    description: &'a str,
}

impl Generator {
    /// Create a generator, parsing every template up front
    pub fn new(store: &Store, today: NaiveDate) -> Result<Self> {
        let engine =
            ThemeLoader::new(&store.template_dir).load(store.config.build.autoescape)?;

        Ok(Self {
            store: store.clone(),
            engine,
            today,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, products: &[Product], posts: &[Post]) -> Result<BuildSummary> {
        let output_dir = &self.store.output_dir;
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output dir {:?}", output_dir))?;

        let assets = copy_static(&self.store.static_dir, output_dir)?;

        let mut summary = BuildSummary {
            products: products.len(),
            posts: posts.len(),
            pages: 0,
            assets,
        };

        summary.pages += self.generate_home(products, posts)?;
        summary.pages += self.generate_products(products)?;
        summary.pages += self.generate_blog(posts)?;
        summary.pages += self.generate_rss(posts)?;
        summary.pages += self.generate_sitemap(products, posts)?;

        Ok(summary)
    }

    /// Context entries shared by every page
    fn site_context(&self) -> Context {
        let mut context = Context::new();
        context.set_object("site", &self.store.config.site);
        context
    }

    fn generate_home(&self, products: &[Product], posts: &[Post]) -> Result<usize> {
        let mut context = self.site_context();
        context.set_object("seo", &self.store.config.seo);
        context.set_object("products", &products);
        context.set_object("posts", &posts);

        let page = PageMeta {
            path: HOME_PATH,
            title: HOME_TITLE,
            description: &self.store.config.seo.description,
        };
        self.render_page(theme::HOME_TEMPLATE, &context, &page)?;
        Ok(1)
    }

    fn generate_products(&self, products: &[Product]) -> Result<usize> {
        let mut context = self.site_context();
        context.set_object("products", &products);

        let index = PageMeta {
            path: PRODUCTS_INDEX_PATH,
            title: PRODUCTS_INDEX_TITLE,
            description: PRODUCTS_INDEX_DESCRIPTION,
        };
        self.render_page(theme::PRODUCTS_INDEX_TEMPLATE, &context, &index)?;

        for product in products {
            let mut context = self.site_context();
            context.set_object("product", product);

            let path = product_path(&product.slug);
            let page = PageMeta {
                path: &path,
                title: &product.title,
                description: or_default(&product.description, &self.store.config.seo.description),
            };
            self.render_page(theme::PRODUCT_TEMPLATE, &context, &page)?;
        }

        Ok(products.len() + 1)
    }

    fn generate_blog(&self, posts: &[Post]) -> Result<usize> {
        let mut context = self.site_context();
        context.set_object("posts", &posts);

        let index = PageMeta {
            path: BLOG_INDEX_PATH,
            title: BLOG_INDEX_TITLE,
            description: BLOG_INDEX_DESCRIPTION,
        };
        self.render_page(theme::BLOG_INDEX_TEMPLATE, &context, &index)?;

        for post in posts {
            let mut context = self.site_context();
            context.set_object("post", post);

            let path = post_path(&post.slug);
            let page = PageMeta {
                path: &path,
                title: &post.title,
                description: or_default(&post.summary, &self.store.config.seo.description),
            };
            self.render_page(theme::POST_TEMPLATE, &context, &page)?;
        }

        Ok(posts.len() + 1)
    }

    fn generate_rss(&self, posts: &[Post]) -> Result<usize> {
        let mut context = self.site_context();
        context.set_object("seo", &self.store.config.seo);
        context.set_object("posts", &posts);

        let xml = self.engine.render(theme::RSS_TEMPLATE, &context)?;
        self.write_output("rss.xml", &xml)?;
        tracing::info!("Generated rss.xml");
        Ok(1)
    }

    fn generate_sitemap(&self, products: &[Product], posts: &[Post]) -> Result<usize> {
        let context = Context::new().with("urls", self.sitemap_urls(products, posts));

        let xml = self.engine.render(theme::SITEMAP_TEMPLATE, &context)?;
        self.write_output("sitemap.xml", &xml)?;
        tracing::info!("Generated sitemap.xml");
        Ok(1)
    }

    /// Absolute URLs of every HTML page: the three index pages, then
    /// products, then posts
    fn sitemap_urls(&self, products: &[Product], posts: &[Post]) -> Vec<String> {
        let base = &self.store.config.site.url;
        let mut urls: Vec<String> = [HOME_PATH, PRODUCTS_INDEX_PATH, BLOG_INDEX_PATH]
            .iter()
            .map(|path| canonical_url(base, path))
            .collect();
        urls.extend(
            products
                .iter()
                .map(|p| canonical_url(base, &product_path(&p.slug))),
        );
        urls.extend(posts.iter().map(|p| canonical_url(base, &post_path(&p.slug))));
        urls
    }

    /// Render an inner template, wrap it in the base template and write it
    fn render_page(&self, template: &str, context: &Context, page: &PageMeta) -> Result<()> {
        let content = self
            .engine
            .render(template, context)
            .with_context(|| format!("Failed to render {}", template))?;

        let mut base = self.site_context();
        base.set_object("seo", &self.store.config.seo);
        base.set_string("jsonld", &self.store_jsonld());
        base.set_number("year", f64::from(self.today.year()));
        base.set_string("page_title", page.title);
        base.set_string("meta_description", page.description);
        base.set_string(
            "canonical",
            &canonical_url(&self.store.config.site.url, page.path),
        );
        base.set_string("content", &content);

        let html = self.engine.render(theme::BASE_TEMPLATE, &base)?;
        self.write_output(page.path, &html)?;
        tracing::debug!("Generated page: {}", page.path);
        Ok(())
    }

    /// schema.org Store description embedded in every page head
    fn store_jsonld(&self) -> String {
        let config = &self.store.config;
        let jsonld = serde_json::json!({
            "@context": "https://schema.org",
            "@type": "Store",
            "name": config.site.name,
            "url": config.site.url,
            "description": config.seo.description,
        });
        // Keep the payload from terminating its <script> element
        jsonld.to_string().replace("</", "<\\/")
    }

    fn write_output(&self, relative: &str, contents: &str) -> Result<()> {
        let output_path = self.store.output_dir.join(relative);
        write_file(&output_path, contents)
    }
}

/// The home page is addressed by the bare site URL
fn canonical_url(base: &str, path: &str) -> String {
    if path == HOME_PATH {
        full_url_for(base, "")
    } else {
        full_url_for(base, path)
    }
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Row;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn store_in(dir: &Path) -> Store {
        fs::create_dir_all(dir.join("data")).unwrap();
        fs::write(
            dir.join(crate::CONFIG_FILE),
            "site:\n  name: Corner Shop\n  url: https://shop.example/\nseo:\n  description: Small things\n",
        )
        .unwrap();
        Store::new(dir).unwrap()
    }

    #[test]
    fn test_canonical_url() {
        assert_eq!(canonical_url("https://a.example", HOME_PATH), "https://a.example/");
        assert_eq!(
            canonical_url("https://a.example/", "blog/hi.html"),
            "https://a.example/blog/hi.html"
        );
    }

    #[test]
    fn test_jsonld_is_script_safe() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.config.seo.description = "</script><b>".to_string();

        let generator = Generator::new(&store, today()).unwrap();
        let jsonld = generator.store_jsonld();
        assert!(!jsonld.contains("</"));
        assert!(jsonld.contains("\"@type\":\"Store\""));
        assert!(jsonld.contains("\"name\":\"Corner Shop\""));
    }

    #[test]
    fn test_generate_writes_pages() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let products = vec![Product::from_row(
            &row(&[("sku", "M1"), ("title", "Blue Mug"), ("price", "12"), ("tags", "kitchen, blue")]),
            today(),
        )];
        let posts = vec![Post::from_row(
            &row(&[
                ("slug", "hello"),
                ("title", "Hello"),
                ("summary", "First post"),
                ("publish_date", "2024-05-01"),
                ("body_markdown", "# Hi\n- <one>"),
            ]),
            today(),
        )];

        let generator = Generator::new(&store, today()).unwrap();
        let summary = generator.generate(&products, &posts).unwrap();
        assert_eq!(summary.pages, 7);

        let out = &store.output_dir;
        let product = fs::read_to_string(out.join("products/m1-blue-mug.html")).unwrap();
        assert!(product.contains("Blue Mug"));
        assert!(product.contains("12.00"));
        assert!(product.contains("<link rel=\"canonical\" href=\"https://shop.example/products/m1-blue-mug.html\">"));

        let home = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(home.contains("href=\"https://shop.example/products/m1-blue-mug.html\""));
        assert!(!home.contains("https://shop.example//"));

        let post = fs::read_to_string(out.join("blog/hello.html")).unwrap();
        assert!(post.contains("<h1>Hi</h1>"));
        assert!(post.contains("<li>&lt;one&gt;</li>"));
        assert!(post.contains("&copy; 2024 Corner Shop"));

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://shop.example/</loc>"));
        assert!(sitemap.contains("<loc>https://shop.example/blog/hello.html</loc>"));

        let rss = fs::read_to_string(out.join("rss.xml")).unwrap();
        assert!(rss.contains("<pubDate>Wed, 01 May 2024 00:00:00 +0000</pubDate>"));
    }
}
