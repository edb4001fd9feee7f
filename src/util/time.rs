use chrono::{DateTime, Utc};

/// Age of a publication time as "5m ago", "3h ago" or "2d ago".
///
/// Timestamps in the future (clock skew on the publisher side) read as "just now".
pub fn format_relative_time(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(published);
    if elapsed.num_seconds() < 60 {
        return "just now".to_string();
    }

    let hours = elapsed.num_hours();
    if hours < 1 {
        format!("{}m ago", elapsed.num_minutes())
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

/// Long-form date for the reader header, e.g. "Sunday, October 18, 2026".
pub fn format_long_date(published: DateTime<Utc>) -> String {
    published.format("%A, %B %-d, %Y").to_string()
}
