//! Sitemap-driven URL resolver library.

pub mod config;
pub mod http;
pub mod observability;
pub mod routing;
pub mod sitemap;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use routing::{Outcome, Router, ViewDescriptor};
pub use sitemap::SitemapStore;
