//! Bounded recency store for watched videos.
//!
//! The whole history lives in a single blob under one backend key. Entries are
//! kept newest first, unique by video ID, and capped at `max_items`. Storage
//! problems never surface as errors: reads degrade to an empty history and
//! writes degrade to an in-memory result, with a status telling the caller
//! which of those happened.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::Backend;
use crate::{fallback_title, thumbnail_url};

pub const MAX_HISTORY_ITEMS: usize = 12;
pub const DEFAULT_STORAGE_KEY: &str = "youtube-player-history";

const FORMAT_VERSION: u32 = 1;

/// One previously watched video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// `<video_id>-<millis>`, unique even when a video is re-added later
    pub id: String,
    pub url: String,
    pub video_id: String,
    pub title: String,
    pub watched_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(url: &str, video_id: &str, title: Option<&str>, now: DateTime<Utc>) -> Self {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| fallback_title(video_id));

        Self {
            id: format!("{video_id}-{}", now.timestamp_millis()),
            url: url.to_string(),
            video_id: video_id.to_string(),
            title,
            watched_at: now,
        }
    }

    pub fn thumbnail(&self) -> String {
        thumbnail_url(&self.video_id)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// What the read half of an operation found in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    /// Nothing stored yet (or cleared)
    Missing,
    /// A blob exists but could not be decoded
    Corrupted,
    /// The backend itself failed to read
    Unavailable,
}

/// Whether a mutation reached the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Saved,
    /// The result is valid for this session only
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    pub entries: Vec<HistoryEntry>,
    pub status: LoadStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub entries: Vec<HistoryEntry>,
    pub loaded: LoadStatus,
    pub write: WriteStatus,
}

impl Update {
    pub fn saved(&self) -> bool {
        self.write == WriteStatus::Saved
    }
}

#[derive(Serialize)]
struct BlobRef<'a> {
    version: u32,
    entries: &'a [HistoryEntry],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Blob {
    Versioned { version: u32, entries: Vec<HistoryEntry> },
    // Unversioned layout: a bare array, possibly with a stored `thumbnail` field
    Legacy(Vec<HistoryEntry>),
}

fn decode(data: &str) -> Result<Vec<HistoryEntry>, String> {
    match serde_json::from_str::<Blob>(data).map_err(|e| e.to_string())? {
        Blob::Versioned { version, entries } if version == FORMAT_VERSION => Ok(entries),
        Blob::Versioned { version, .. } => Err(format!("unsupported history format version {version}")),
        Blob::Legacy(entries) => {
            debug!("Read unversioned history blob with {} entries", entries.len());
            Ok(entries)
        }
    }
}

/// Capped, deduplicated, most-recent-first history over a key-value backend
#[derive(Debug)]
pub struct HistoryStore<B> {
    backend: B,
    key: String,
    max_items: usize,
}

impl<B: Backend> HistoryStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            key: DEFAULT_STORAGE_KEY.to_string(),
            max_items: MAX_HISTORY_ITEMS,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Cap on stored entries. A cap of 0 is raised to 1.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        if max_items == 0 {
            warn!("History cap of 0 would discard every entry, using 1");
        }
        self.max_items = max_items.max(1);
        self
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Read the persisted history. Absent, unreadable and corrupted blobs all
    /// produce an empty list; `status` says which.
    pub fn load(&self) -> History {
        let data = match self.backend.get(&self.key) {
            Ok(Some(data)) => data,
            Ok(None) => {
                return History {
                    entries: Vec::new(),
                    status: LoadStatus::Missing,
                };
            }
            Err(e) => {
                error!("Error loading video history: {e}");
                return History {
                    entries: Vec::new(),
                    status: LoadStatus::Unavailable,
                };
            }
        };

        match decode(&data) {
            Ok(entries) => History {
                entries: self.normalize(entries),
                status: LoadStatus::Loaded,
            },
            Err(e) => {
                error!("Discarding corrupted video history under {:?}: {e}", self.key);
                History {
                    entries: Vec::new(),
                    status: LoadStatus::Corrupted,
                }
            }
        }
    }

    /// Blobs written elsewhere (older layouts, a larger cap) may hold
    /// duplicates or too many entries: keep the first, i.e. most recent,
    /// entry per video and cut the tail.
    fn normalize(&self, entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
        let before = entries.len();
        let mut seen = HashSet::new();
        let mut kept: Vec<HistoryEntry> = entries
            .into_iter()
            .filter(|e| seen.insert(e.video_id.clone()))
            .collect();
        kept.truncate(self.max_items);
        if kept.len() != before {
            debug!("Normalized stored history from {before} to {} entries", kept.len());
        }
        kept
    }

    /// Record a watch of `video_id` now. See [`HistoryStore::add_at`].
    pub fn add(&mut self, url: &str, video_id: &str, title: Option<&str>) -> Result<Update, HistoryError> {
        self.add_at(url, video_id, title, Utc::now())
    }

    /// Record a watch of `video_id` at `now`: any existing entry for the same
    /// video is dropped, the new entry goes to the front, and the tail beyond
    /// `max_items` is evicted. The returned entries are what was (or would have
    /// been) persisted.
    pub fn add_at(
        &mut self,
        url: &str,
        video_id: &str,
        title: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Update, HistoryError> {
        let video_id = video_id.trim();
        if video_id.is_empty() {
            return Err(HistoryError::InvalidArgument("video id must not be empty"));
        }

        let History { entries, status } = self.load();

        let mut updated = Vec::with_capacity(self.max_items.min(entries.len() + 1));
        updated.push(HistoryEntry::new(url, video_id, title, now));
        updated.extend(entries.into_iter().filter(|e| e.video_id != video_id));
        updated.truncate(self.max_items);

        let write = self.save(&updated);
        Ok(Update {
            entries: updated,
            loaded: status,
            write,
        })
    }

    /// Delete the persisted blob. Clearing an empty store is a no-op.
    pub fn clear(&mut self) -> WriteStatus {
        match self.backend.remove(&self.key) {
            Ok(()) => {
                debug!("Cleared video history under {:?}", self.key);
                WriteStatus::Saved
            }
            Err(e) => {
                error!("Error clearing video history: {e}");
                WriteStatus::Failed
            }
        }
    }

    fn save(&mut self, entries: &[HistoryEntry]) -> WriteStatus {
        let blob = BlobRef {
            version: FORMAT_VERSION,
            entries,
        };
        let data = match serde_json::to_string(&blob) {
            Ok(data) => data,
            Err(e) => {
                error!("Error serializing video history: {e}");
                return WriteStatus::Failed;
            }
        };

        match self.backend.set(&self.key, &data) {
            Ok(()) => WriteStatus::Saved,
            Err(e) => {
                warn!("Error saving video history, keeping it in memory only: {e}");
                WriteStatus::Failed
            }
        }
    }
}
