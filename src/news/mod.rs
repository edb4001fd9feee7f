//! News domain: queries, intent resolution, and the loading indicator.
//!
//! - `query` - `Category` and the tagged `Query` variant
//! - `intent` - maps UI triggers onto exactly one `Query`
//! - `loading` - guard-based loading flag shared with the UI
//! - `catalog` - fixed trending tags

mod catalog;
mod intent;
mod loading;
mod query;

pub use catalog::{TrendingTag, TRENDING_TAGS};
pub use intent::{QueryIntent, MIN_SEARCH_CHARS};
pub use loading::{LoadingFlag, LoadingGuard};
pub use query::{Category, Query, UnknownCategory};
