//! File server implementation
//!
//! Requested names come from untrusted callers. Only the final path
//! component of a request is ever joined onto the root, so a resolved path
//! is always a direct child of the root regardless of what the caller sent.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use notas_core::error::Result;

/// Static document server
#[derive(Debug, Clone)]
pub struct FileServer {
    root: PathBuf,
    content_type: String,
}

/// A document ready to be sent
#[derive(Debug, Clone)]
pub struct ServedFile {
    pub content: Bytes,
    pub content_type: String,
    pub content_length: u64,
    pub path: PathBuf,
    pub last_modified: Option<String>,
}

/// Outcome of a file request
#[derive(Debug)]
pub enum Lookup {
    /// The document exists and was read in full
    Found(ServedFile),
    /// Nothing servable under that name
    NotFound,
    /// No usable name was given; the caller's fallback applies
    Declined,
}

/// Reduce an untrusted name to its final path component.
///
/// Both `/` and `\` count as separators and trailing separators are
/// ignored, so `c.pdf/` names `c.pdf`. Returns `None` when nothing usable
/// remains (empty, `.` or `..`).
pub fn base_name(requested: &str) -> Option<&str> {
    let trimmed = requested.trim_end_matches(['/', '\\']);
    let base = trimmed.rsplit(['/', '\\']).next().unwrap_or("");
    match base {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

impl FileServer {
    /// Create a new file server
    pub fn new(root: impl Into<PathBuf>, content_type: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            content_type: content_type.into(),
        }
    }

    /// Directory being served
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a request would be served from, if it names anything at all
    pub fn resolve(&self, requested: &str) -> Option<PathBuf> {
        base_name(requested).map(|name| self.root.join(name))
    }

    /// Serve a file request
    pub async fn serve(&self, requested: &str) -> Result<Lookup> {
        if requested.is_empty() {
            return Ok(Lookup::Declined);
        }

        let Some(file_path) = self.resolve(requested) else {
            tracing::debug!("🚫 Rejected file request {:?}", requested);
            return Ok(Lookup::NotFound);
        };

        tracing::debug!("📁 Serving request: {:?} -> {:?}", requested, file_path);

        let metadata = match tokio::fs::metadata(&file_path).await {
            Ok(m) if m.is_file() => m,
            Ok(_) | Err(_) => return Ok(Lookup::NotFound),
        };

        let last_modified = metadata.modified().ok().map(httpdate::fmt_http_date);

        let content = match tokio::fs::read(&file_path).await {
            Ok(content) => Bytes::from(content),
            // Removed between the stat and the read.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Lookup::NotFound),
            Err(e) => return Err(e.into()),
        };

        Ok(Lookup::Found(ServedFile {
            content_length: content.len() as u64,
            content,
            content_type: self.content_type.clone(),
            path: file_path,
            last_modified,
        }))
    }
}
