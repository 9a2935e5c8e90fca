//! Notas HTTP API
//!
//! Serves the document listing as JSON and individual documents by name.

mod handlers;
pub mod routes;
pub mod server;

pub use routes::ApiRouter;
pub use server::{bind, run_server};
