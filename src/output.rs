use chrono::{DateTime, Utc};
use eyre::Result;
use serde::Serialize;

use crate::HistoryEntry;
use crate::reltime::format_relative_time;

/// Render history as one line per entry, newest first
pub fn render_text(entries: &[HistoryEntry], now: DateTime<Utc>) -> String {
    entries
        .iter()
        .map(|e| {
            format!(
                "{:>10}  {}  {}",
                format_relative_time(e.watched_at, now),
                e.video_id,
                e.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonEntry<'a> {
    #[serde(flatten)]
    entry: &'a HistoryEntry,
    thumbnail: String,
}

/// Render history as a JSON array, with thumbnails filled in
pub fn render_json(entries: &[HistoryEntry]) -> Result<String> {
    let rows: Vec<JsonEntry<'_>> = entries
        .iter()
        .map(|entry| JsonEntry {
            entry,
            thumbnail: entry.thumbnail(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn sample_entries() -> Vec<HistoryEntry> {
        vec![
            HistoryEntry {
                id: "abc123-1".to_string(),
                url: "https://youtu.be/abc123".to_string(),
                video_id: "abc123".to_string(),
                title: "Test Video".to_string(),
                watched_at: now() - Duration::minutes(5),
            },
            HistoryEntry {
                id: "def456-1".to_string(),
                url: "https://youtu.be/def456".to_string(),
                video_id: "def456".to_string(),
                title: "Older Video".to_string(),
                watched_at: now() - Duration::hours(3),
            },
        ]
    }

    #[test]
    fn test_render_text() {
        let output = render_text(&sample_entries(), now());
        assert_eq!(
            output,
            "    5m ago  abc123  Test Video\n    3h ago  def456  Older Video"
        );
    }

    #[test]
    fn test_render_text_empty() {
        assert_eq!(render_text(&[], now()), "");
    }

    #[test]
    fn test_render_json_includes_thumbnail() {
        let output = render_json(&sample_entries()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["videoId"], "abc123");
        assert_eq!(rows[0]["thumbnail"], "https://img.youtube.com/vi/abc123/mqdefault.jpg");
        assert_eq!(rows[1]["title"], "Older Video");
    }
}
