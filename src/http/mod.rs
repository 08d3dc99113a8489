//! HTTP serving adapter.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace layer)
//!     → strip web root, keep query string
//!     → routing::Router::resolve
//!     → 301/302 + Location | 404 JSON | 200 JSON view descriptor
//! ```
//!
//! Rendering the view is left to whatever consumes the descriptor.

pub mod server;

pub use server::{AppState, HttpServer, X_ROBOTS_TAG};
