//! Notas Static Document Module
//!
//! The listing and serving core shared by every Notas front end:
//! - Directory listing filtered to one document extension
//! - Locators for static or query-style URLs
//! - Traversal-proof single file serving
//! - JSON manifest generation

mod file_server;
mod index;
mod lister;
mod locator;
mod mime;

pub use file_server::{FileServer, Lookup, ServedFile, base_name};
pub use index::write_index;
pub use lister::{FileDescriptor, Lister};
pub use locator::Locator;
pub use mime::content_type_for_extension;

use notas_core::config::NotasConfig;

/// Build the lister and file server for a configuration.
pub fn from_config(config: &NotasConfig) -> (Lister, FileServer) {
    let lister = Lister::new(config.library.clone(), Locator::from_config(config));
    let file_server = FileServer::new(
        config.library.dir.clone(),
        content_type_for_extension(&config.library.extension),
    );
    (lister, file_server)
}
