//! Content module - product and post records and Markdown bodies

pub mod loader;
pub mod markdown;
mod post;
mod product;

pub use loader::{ContentLoader, Row};
pub use post::Post;
pub use product::Product;
