//! Helper functions shared by the loader, generator and feed fetcher

mod date;
mod fields;
mod url;

pub use date::*;
pub use fields::*;
pub use url::*;
