//! Notas Core Library
//!
//! Shared building blocks for the Notas document server: the error type
//! and the single configuration surface every front end reads from.

pub mod config;
pub mod error;

pub use error::{Error, Result};

/// Notas version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
