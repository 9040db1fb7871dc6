pub mod backend;
pub mod cache;
pub mod config;
pub mod history;
pub mod oembed;
pub mod output;
pub mod reltime;

use std::sync::LazyLock;

use regex::Regex;

pub use history::{HistoryEntry, HistoryError, HistoryStore, MAX_HISTORY_ITEMS};
pub use reltime::format_relative_time;

const THUMBNAIL_HOST: &str = "https://img.youtube.com";

static BARE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap());

/// URL shapes that carry a video ID, tried in order. The ID must run up to a
/// delimiter or the end of the input, so an over-long ID never matches as a
/// shorter one.
static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // youtube.com/watch?v=ID
        r"youtube\.com/watch\?(?:[^#]*&)?v=([a-zA-Z0-9_-]+)(?:[&#]|$)",
        // youtu.be/ID
        r"youtu\.be/([a-zA-Z0-9_-]+)(?:[?&#/]|$)",
        // youtube.com/embed/ID
        r"youtube\.com/embed/([a-zA-Z0-9_-]+)(?:[?&#/]|$)",
        // youtube.com/v/ID
        r"youtube\.com/v/([a-zA-Z0-9_-]+)(?:[?&#/]|$)",
        // youtube.com/shorts/ID
        r"youtube\.com/shorts/([a-zA-Z0-9_-]+)(?:[?&#/]|$)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Extract video ID from various YouTube URL formats
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    if BARE_ID.is_match(input) {
        return Some(input.to_string());
    }

    URL_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| caps[1].to_string())
}

pub fn is_valid_youtube_url(input: &str) -> bool {
    extract_video_id(input).is_some()
}

/// Medium-quality thumbnail for a video. Never stored, always derived.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("{THUMBNAIL_HOST}/vi/{video_id}/mqdefault.jpg")
}

pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{video_id}")
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Placeholder title used when no real title could be resolved
pub fn fallback_title(video_id: &str) -> String {
    let short: String = video_id.chars().take(8).collect();
    format!("YouTube Video {short}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_video_id() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_v_not_first() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_embed_and_v_urls() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            extract_video_id("http://youtube.com/v/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_shorts_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_ids_in_urls() {
        assert_eq!(extract_video_id("https://youtu.be/abc123"), Some("abc123".to_string()));
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123&list=PL1"),
            Some("abc123".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/abc123/"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_long_ids_are_not_truncated() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQEXTRA"),
            Some("dQw4w9WgXcQEXTRA".to_string())
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ123"),
            Some("dQw4w9WgXcQ123".to_string())
        );
    }

    #[test]
    fn test_id_with_invalid_characters() {
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9$WgXcQ"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=abc.def"), None);
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v="), None);
    }

    #[test]
    fn test_invalid_url() {
        assert_eq!(extract_video_id("not-a-valid-id"), None);
        assert!(!is_valid_youtube_url("https://vimeo.com/123456"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(extract_video_id("  dQw4w9WgXcQ  "), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_derived_urls() {
        assert_eq!(thumbnail_url("abc123"), "https://img.youtube.com/vi/abc123/mqdefault.jpg");
        assert_eq!(embed_url("abc123"), "https://www.youtube.com/embed/abc123");
        assert_eq!(watch_url("abc123"), "https://www.youtube.com/watch?v=abc123");
    }

    #[test]
    fn test_fallback_title() {
        assert_eq!(fallback_title("dQw4w9WgXcQ"), "YouTube Video dQw4w9Wg...");
        assert_eq!(fallback_title("abc"), "YouTube Video abc...");
    }
}
