//! Theme module - page templates and static assets
//!
//! Every template the generator needs has a built-in default compiled into
//! the binary; a file with the same name in the site's template directory
//! takes precedence.

mod loader;

pub use loader::{copy_static, ThemeLoader};

/// Wrapper applied to every HTML page
pub const BASE_TEMPLATE: &str = "base.html";
pub const HOME_TEMPLATE: &str = "index.html";
pub const PRODUCTS_INDEX_TEMPLATE: &str = "products_index.html";
pub const PRODUCT_TEMPLATE: &str = "product.html";
pub const BLOG_INDEX_TEMPLATE: &str = "blog_index.html";
pub const POST_TEMPLATE: &str = "post.html";
pub const RSS_TEMPLATE: &str = "rss.xml";
pub const SITEMAP_TEMPLATE: &str = "sitemap.xml";

/// Built-in templates, by file name
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (BASE_TEMPLATE, include_str!("builtin/base.html")),
    (HOME_TEMPLATE, include_str!("builtin/index.html")),
    (
        PRODUCTS_INDEX_TEMPLATE,
        include_str!("builtin/products_index.html"),
    ),
    (PRODUCT_TEMPLATE, include_str!("builtin/product.html")),
    (BLOG_INDEX_TEMPLATE, include_str!("builtin/blog_index.html")),
    (POST_TEMPLATE, include_str!("builtin/post.html")),
    (RSS_TEMPLATE, include_str!("builtin/rss.xml")),
    (SITEMAP_TEMPLATE, include_str!("builtin/sitemap.xml")),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;

    #[test]
    fn test_builtin_templates_parse() {
        for (name, source) in BUILTIN_TEMPLATES {
            assert!(Template::parse(source).is_ok(), "{} should parse", name);
        }
    }
}
