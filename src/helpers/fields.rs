//! Normalization of raw record fields

/// Split a comma separated tag list, dropping blanks
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Format a price with two decimals, `0.00` when it is not a number
pub fn format_price(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(value) => format_price_value(value),
        Err(_) => "0.00".to_string(),
    }
}

/// Format a numeric price with two decimals, `0.00` for NaN or infinity
pub fn format_price_value(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "0.00".to_string()
    }
}

/// Slug for a product page, built from SKU and title
pub fn product_slug(sku: &str, title: &str) -> String {
    let slug = slug::slugify(format!("{}-{}", sku, title));
    if slug.is_empty() {
        slug::slugify(title)
    } else {
        slug
    }
}

/// Fallback SKU derived from a title: first eight characters, upper-cased,
/// spaces replaced by dashes
pub fn fallback_sku(title: &str) -> String {
    let head: String = title.chars().take(8).collect();
    let head = if head.is_empty() { "ITEM".to_string() } else { head };
    head.to_uppercase().replace(' ', "-")
}
