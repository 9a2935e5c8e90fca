//! Directory listing
//!
//! Scans the document directory on every call and turns each regular file
//! with the recognized extension into a [`FileDescriptor`]. Nothing is
//! cached; the filesystem is the only source of truth.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use notas_core::config::{LibraryConfig, MissingDirPolicy, UnreadablePolicy};
use notas_core::error::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::locator::Locator;

/// One listed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// File name exactly as found on disk
    pub name: String,
    /// Locator the front end requests the file with
    pub path: String,
}

/// Directory lister
#[derive(Debug, Clone)]
pub struct Lister {
    config: LibraryConfig,
    locator: Locator,
}

impl Lister {
    /// Create a new lister
    pub fn new(config: LibraryConfig, locator: Locator) -> Self {
        Self { config, locator }
    }

    /// Directory being listed
    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Locator used for descriptor paths
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Whether `name` carries the recognized extension, ignoring ASCII case
    pub fn matches_extension(&self, name: &str) -> bool {
        match name.rsplit_once('.') {
            Some((_, ext)) => ext.eq_ignore_ascii_case(&self.config.extension),
            None => false,
        }
    }

    /// List the documents currently in the directory, in enumeration order
    pub async fn list(&self) -> Result<Vec<FileDescriptor>> {
        let dir = &self.config.dir;

        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return self.missing_dir().await,
            Err(e) => return self.unreadable(dir.clone(), e),
        };

        let mut files = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => return self.unreadable(dir.clone(), e),
            };

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                tracing::debug!("Skipping non UTF-8 file name {:?}", file_name);
                continue;
            };

            if !self.matches_extension(name) {
                continue;
            }

            // Follows symlinks: a link to a document is listed, a directory
            // named like one is not.
            match tokio::fs::metadata(entry.path()).await {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => {
                    tracing::debug!("Skipping {:?}: not a regular file", name);
                    continue;
                }
                Err(e) => {
                    tracing::debug!("Skipping {:?}: {}", name, e);
                    continue;
                }
            }

            files.push(FileDescriptor {
                name: name.to_string(),
                path: self.locator.locate(name),
            });
        }

        tracing::debug!("📄 Listed {} document(s) in {}", files.len(), dir.display());
        Ok(files)
    }

    async fn missing_dir(&self) -> Result<Vec<FileDescriptor>> {
        let dir = &self.config.dir;
        match self.config.on_missing {
            MissingDirPolicy::Empty => {
                tracing::debug!("Directory {} does not exist", dir.display());
            }
            MissingDirPolicy::Create => {
                tracing::info!("📁 Creating directory {}", dir.display());
                if let Err(e) = tokio::fs::create_dir_all(dir).await {
                    return self.unreadable(dir.clone(), e);
                }
            }
        }
        Ok(Vec::new())
    }

    fn unreadable(&self, path: PathBuf, source: std::io::Error) -> Result<Vec<FileDescriptor>> {
        match self.config.on_unreadable {
            UnreadablePolicy::Empty => {
                tracing::warn!("⚠️ Cannot read directory {}: {}", path.display(), source);
                Ok(Vec::new())
            }
            UnreadablePolicy::Error => Err(Error::UnreadableDirectory { path, source }),
        }
    }
}
