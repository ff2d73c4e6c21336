use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// `m:ss` between two instants; negative spans render as `0:00`.
#[must_use]
pub fn format_duration(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let seconds = (to - from).num_seconds().max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
