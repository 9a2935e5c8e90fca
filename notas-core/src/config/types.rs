//! Configuration type definitions
//!
//! These types represent the runtime configuration for Notas. Every field
//! has a default so an empty file (or no file at all) is a valid config.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Root configuration for Notas
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotasConfig {
    /// Document directory and listing behaviour
    #[serde(default)]
    pub library: LibraryConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Static manifest generation
    #[serde(default)]
    pub index: IndexConfig,

    /// Global logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Document directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory holding the documents
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Recognized extension, without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// How descriptor paths are built
    #[serde(default)]
    pub locator: LocatorStyle,

    /// URL prefix the directory is exposed under for static locators
    #[serde(default = "default_static_prefix")]
    pub static_prefix: String,

    /// What listing does when the directory is absent
    #[serde(default)]
    pub on_missing: MissingDirPolicy,

    /// What listing does when the directory cannot be read
    #[serde(default)]
    pub on_unreadable: UnreadablePolicy,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            extension: default_extension(),
            locator: LocatorStyle::default(),
            static_prefix: default_static_prefix(),
            on_missing: MissingDirPolicy::default(),
            on_unreadable: UnreadablePolicy::default(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("notas")
}

fn default_extension() -> String {
    "pdf".to_string()
}

fn default_static_prefix() -> String {
    "/notas".to_string()
}

/// Locator styles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocatorStyle {
    /// `<static_prefix>/<name>`
    Static,
    /// `<file_path>?<file_param>=<name>`
    #[default]
    Query,
}

/// Behaviour for a directory that does not exist
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingDirPolicy {
    /// Report an empty listing
    Empty,
    /// Create the directory, then report an empty listing
    #[default]
    Create,
}

/// Behaviour for a directory that exists but cannot be enumerated
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnreadablePolicy {
    /// Log a warning and report an empty listing
    Empty,
    /// Surface the I/O failure to the caller
    #[default]
    Error,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Route for the JSON listing
    #[serde(default = "default_list_path")]
    pub list_path: String,

    /// Route for single-file downloads
    #[serde(default = "default_file_path")]
    pub file_path: String,

    /// Query parameter carrying the file name
    #[serde(default = "default_file_param")]
    pub file_param: String,

    /// Value of `Access-Control-Allow-Origin`, if any
    #[serde(default = "default_cors_allow_origin")]
    pub cors_allow_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            list_path: default_list_path(),
            file_path: default_file_path(),
            file_param: default_file_param(),
            cors_allow_origin: default_cors_allow_origin(),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_list_path() -> String {
    "/api/list".to_string()
}

fn default_file_path() -> String {
    "/api/file".to_string()
}

fn default_file_param() -> String {
    "name".to_string()
}

fn default_cors_allow_origin() -> Option<String> {
    Some("*".to_string())
}

/// Static manifest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Where the JSON manifest is written
    #[serde(default = "default_index_output")]
    pub output: PathBuf,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            output: default_index_output(),
        }
    }
}

fn default_index_output() -> PathBuf {
    PathBuf::from("public/notas.json")
}

/// Global logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level, used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl NotasConfig {
    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        let ext = &self.library.extension;
        if ext.is_empty() {
            return Err(Error::Config("library.extension must not be empty".to_string()));
        }
        // Matching looks only at the text after the final dot.
        if ext.contains('.') {
            return Err(Error::Config(format!(
                "library.extension must not contain a dot: {:?}",
                ext
            )));
        }
        if ext.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "library.extension must not contain a path separator: {:?}",
                ext
            )));
        }

        for (field, value) in [
            ("library.static_prefix", &self.library.static_prefix),
            ("server.list_path", &self.server.list_path),
            ("server.file_path", &self.server.file_path),
        ] {
            if !value.starts_with('/') {
                return Err(Error::Config(format!("{} must start with '/': {:?}", field, value)));
            }
        }

        if self.server.file_param.is_empty() {
            return Err(Error::Config("server.file_param must not be empty".to_string()));
        }

        self.server
            .listen
            .parse::<std::net::SocketAddr>()
            .map_err(|e| Error::Config(format!("Invalid listen address {:?}: {}", self.server.listen, e)))?;

        Ok(())
    }
}
