//! Utility functions for common operations.
//!
//! - **URL validation**: article links are checked before opening in a browser
//! - **Text processing**: Unicode-aware width, truncation, control-char
//!   stripping and article body cleanup
//! - **Time formatting**: relative ages and long-form dates

mod text;
mod time;
mod url_validator;

pub use text::{
    article_paragraphs, display_width, strip_control_chars, strip_truncation_marker,
    truncate_to_width,
};
pub use time::{format_long_date, format_relative_time};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Maximum search box length in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
