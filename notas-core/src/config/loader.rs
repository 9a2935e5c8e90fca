//! Configuration loader

use crate::error::{Error, Result};
use crate::config::NotasConfig;
use std::path::Path;

/// Configuration loader for various formats
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<NotasConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config = match ext {
            "json" => Self::from_json(&content)?,
            "toml" => Self::from_toml(&content)?,
            _ => return Err(Error::Config(format!("Unknown config format: {}", ext))),
        };

        tracing::debug!("📄 Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` when given, else `default_path` when it exists, else defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>, default_path: &Path) -> Result<NotasConfig> {
        match path {
            Some(p) => Self::load(p),
            None if default_path.is_file() => Self::load(default_path),
            None => Ok(NotasConfig::default()),
        }
    }

    /// Parse JSON configuration
    pub fn from_json(content: &str) -> Result<NotasConfig> {
        serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid JSON: {}", e)))
    }

    /// Parse TOML configuration
    pub fn from_toml(content: &str) -> Result<NotasConfig> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocatorStyle;

    #[test]
    fn test_json_loading() {
        let json = r#"{"library": {"extension": "PDF"}}"#;
        let config = ConfigLoader::from_json(json).unwrap();
        assert_eq!(config.library.extension, "PDF");
    }

    #[test]
    fn test_toml_loading() {
        let toml = r#"
            [library]
            dir = "public/notas"
            locator = "static"

            [server]
            listen = "0.0.0.0:9000"
        "#;
        let config = ConfigLoader::from_toml(toml).unwrap();
        assert_eq!(config.library.locator, LocatorStyle::Static);
        assert_eq!(config.server.listen, "0.0.0.0:9000");
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notas.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.logging.level, "debug");

        let yaml = dir.path().join("notas.yaml");
        std::fs::write(&yaml, "").unwrap();
        assert!(matches!(ConfigLoader::load(&yaml), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("notas.toml");
        let config = ConfigLoader::load_or_default(None::<&Path>, &missing).unwrap();
        assert_eq!(config.library.extension, "pdf");
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(ConfigLoader::load_or_default(Some(&missing), &missing).is_err());
    }
}
