use chrono::{DateTime, Local, Utc};

/// Human-friendly "time since" label for a watch timestamp.
///
/// Buckets are floor-divided: 59m59s is "59m ago", exactly 60 minutes is
/// "1h ago". Anything a week or older falls back to the local calendar date.
pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - at).num_minutes();

    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }

    let days = hours / 24;
    if days < 7 {
        return format!("{days}d ago");
    }

    at.with_timezone(&Local).format("%-m/%-d/%Y").to_string()
}

pub fn format_relative_time_now(at: DateTime<Utc>) -> String {
    format_relative_time(at, Utc::now())
}
