//! Static manifest generation
//!
//! Writes the listing to a JSON file so a front end can be deployed without
//! a live listing endpoint.

use std::path::Path;

use notas_core::error::{Error, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::lister::{FileDescriptor, Lister};

/// List the directory and write the descriptors to `output`.
pub async fn write_index(lister: &Lister, output: &Path) -> Result<Vec<FileDescriptor>> {
    let files = lister.list().await?;

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    files
        .serialize(&mut ser)
        .map_err(|e| Error::Internal(format!("Failed to encode index: {}", e)))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output, &buf).await?;

    tracing::info!("✅ Wrote {} with {} file(s)", output.display(), files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Locator;
    use notas_core::config::LibraryConfig;

    #[tokio::test]
    async fn test_writes_indented_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("public").join("notas");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.pdf"), b"a").unwrap();
        std::fs::write(dir.join("readme.md"), b"r").unwrap();

        let lister = Lister::new(
            LibraryConfig {
                dir: dir.clone(),
                ..Default::default()
            },
            Locator::Static { prefix: "/notas".to_string() },
        );
        let output = tmp.path().join("public").join("notas.json");

        let files = write_index(&lister, &output).await.unwrap();
        assert_eq!(files.len(), 1);

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "[\n    {\n        \"name\": \"a.pdf\",\n        \"path\": \"/notas/a.pdf\"\n    }\n]"
        );
    }

    #[tokio::test]
    async fn test_creates_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("notas");
        let output = tmp.path().join("out").join("notas.json");

        let lister = Lister::new(
            LibraryConfig {
                dir: dir.clone(),
                ..Default::default()
            },
            Locator::Static { prefix: "/notas".to_string() },
        );

        let files = write_index(&lister, &output).await.unwrap();
        assert!(files.is_empty());
        assert!(dir.is_dir());
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "[]");
    }
}
