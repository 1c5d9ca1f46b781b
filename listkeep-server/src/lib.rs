//! listkeep-server: list management over HTTP
//!
//! Resourceful CRUD for lists backed by SQLite, rendered as full pages,
//! Turbo Stream fragments, or JSON.

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, DbError};
pub use http::{build_app, run_server, ServerConfig};
