//! HTTP server layer
//!
//! Axum server with:
//! - Resourceful list routes rendered as HTML, Turbo Stream, or JSON
//! - Request tracing and timeouts
//! - Graceful shutdown
//! - JSON error responses

pub mod server;
pub mod error;
pub mod extractors;
pub mod respond;
pub mod views;
pub mod routes;

pub use server::{build_app, build_router, run_server, App, AppState, ServerConfig};
pub use error::ApiError;
