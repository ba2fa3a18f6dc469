//! URL helper functions

/// Join the site URL and a path with exactly one slash between them
///
/// # Examples
/// ```ignore
/// full_url_for("https://shop.example/", "/products/index.html")
/// // -> "https://shop.example/products/index.html"
/// ```
pub fn full_url_for(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Output path of a product page, relative to the output directory
pub fn product_path(slug: &str) -> String {
    format!("products/{}.html", slug)
}

/// Output path of a blog post page, relative to the output directory
pub fn post_path(slug: &str) -> String {
    format!("blog/{}.html", slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url_for() {
        assert_eq!(full_url_for("https://a.example", ""), "https://a.example/");
        assert_eq!(
            full_url_for("https://a.example/", "/blog/index.html"),
            "https://a.example/blog/index.html"
        );
        assert_eq!(
            full_url_for("https://a.example", &product_path("tee")),
            "https://a.example/products/tee.html"
        );
    }

    #[test]
    fn test_post_path() {
        assert_eq!(post_path("hello"), "blog/hello.html");
    }
}
