use std::path::{Path, PathBuf};

use eyre::{Result, bail};
use log::debug;

/// Resolved video titles, one small file per video ID
#[derive(Debug, Clone)]
pub struct TitleCache {
    dir: PathBuf,
}

impl Default for TitleCache {
    fn default() -> Self {
        Self::new(default_dir())
    }
}

fn default_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("ythistory")
        .join("titles")
}

impl TitleCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, video_id: &str) -> Option<PathBuf> {
        let valid = !video_id.is_empty()
            && video_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.dir.join(format!("{video_id}.txt")))
    }

    /// Load a cached title, if available.
    pub fn get(&self, video_id: &str) -> Option<String> {
        let path = self.path(video_id)?;
        let title = std::fs::read_to_string(&path).ok()?;
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        debug!("Cache hit: {}", path.display());
        Some(title.to_string())
    }

    /// Save a title to the cache.
    pub fn put(&self, video_id: &str, title: &str) -> Result<()> {
        let Some(path) = self.path(video_id) else {
            bail!("refusing to cache title for video id {video_id:?}");
        };
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, title.trim())?;
        debug!("Cached title: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = TitleCache::new(tmp.path().join("titles"));
        assert_eq!(cache.get("dQw4w9WgXcQ"), None);

        cache.put("dQw4w9WgXcQ", "Never Gonna Give You Up\n").unwrap();
        assert_eq!(cache.get("dQw4w9WgXcQ").as_deref(), Some("Never Gonna Give You Up"));
    }

    #[test]
    fn test_rejects_unsafe_ids() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = TitleCache::new(tmp.path());
        assert!(cache.put("../etc", "x").is_err());
        assert!(cache.put("", "x").is_err());
        assert_eq!(cache.get("../etc"), None);
    }

    #[test]
    fn test_blank_entry_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = TitleCache::new(tmp.path());
        cache.put("abc123", "   ").unwrap();
        assert_eq!(cache.get("abc123"), None);
    }
}
