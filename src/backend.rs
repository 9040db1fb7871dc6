use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use eyre::{Result, bail};
use log::{debug, warn};

/// A string key-value store holding whole serialized blobs
pub trait Backend {
    /// Returns `Ok(None)` when the key has never been written or was removed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// One file per key, `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<data_dir>/ythistory`, or `./.ythistory` when the platform has no data dir
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("ythistory"))
            .unwrap_or_else(|| PathBuf::from(".ythistory"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            bail!("invalid storage key: {key:?}");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Backend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => {
                debug!("Read {} bytes from {}", bytes.len(), path.display());
                // invalid UTF-8 is a damaged blob, not a failed read
                let data = match String::from_utf8(bytes) {
                    Ok(data) => data,
                    Err(e) => {
                        warn!("{} is not valid UTF-8", path.display());
                        String::from_utf8_lossy(e.as_bytes()).into_owned()
                    }
                };
                Ok(Some(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key)?;
        std::fs::create_dir_all(&self.dir)?;
        // write-then-rename; the temp name is per process so concurrent
        // writers never share a partial file
        let tmp = self.dir.join(format!(".{key}.json.{}.tmp", std::process::id()));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local backend, used by tests and callers that don't want persistence
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}
