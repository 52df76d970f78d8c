//! Local filesystem storage for the published site.
//!
//! ## Storage Layout
//!
//! ```text
//! {public_dir}/
//! ├── url-mapping.json                  # event id -> page filename
//! ├── sitemap.xml
//! ├── index.html                        # legacy landing page
//! ├── _redirects                        # Cloudflare Pages rules
//! ├── generated_redirects.htaccess
//! ├── cloudflare_worker_complete.js
//! ├── pages/
//! │   └── {code}-{slug}.html
//! ├── events/
//! │   ├── index.html
//! │   └── {code}.html
//! └── rows/
//!     └── {sheet}.json
//! ```
//!
//! Every write goes to a sibling temp file first and is then renamed over the
//! target, so readers never observe a half-written artifact.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// A regular file found by [`LocalStorage::list_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub modified: DateTime<Local>,
}

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a relative key.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_parent(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Create a directory (and parents) under the root.
    pub async fn ensure_dir(&self, key: &str) -> Result<()> {
        tokio::fs::create_dir_all(self.path(key)).await?;
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    pub async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_parent(&path).await?;

        let mut tmp_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| AppError::validation(format!("invalid storage key: {key:?}")))?;
        tmp_name.push(".tmp");
        let tmp = path.with_file_name(tmp_name);

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    pub async fn write_text(&self, key: &str, text: &str) -> Result<()> {
        self.write_bytes(key, text.as_bytes()).await
    }

    /// Write pretty-printed JSON.
    pub async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    pub async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read UTF-8 text, returning None if file doesn't exist.
    pub async fn read_text(&self, key: &str) -> Result<Option<String>> {
        match self.read_bytes(key).await? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| AppError::validation(format!("{key} is not UTF-8: {e}"))),
            None => Ok(None),
        }
    }

    /// Read JSON data.
    pub async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, key: &str) -> bool {
        tokio::fs::try_exists(self.path(key)).await.unwrap_or(false)
    }

    /// Regular files directly inside `key`, sorted by name.
    ///
    /// A missing directory lists as empty.
    pub async fn list_dir(&self, key: &str) -> Result<Vec<FileEntry>> {
        let mut dir = match tokio::fs::read_dir(self.path(key)).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.ends_with(".tmp") {
                continue;
            }
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            entries.push(FileEntry {
                name,
                modified: DateTime::<Local>::from(modified),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
