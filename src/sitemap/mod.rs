//! Sitemap subsystem.
//!
//! # Data Flow
//! ```text
//! {language}.sitemap.toml (overrides/ first, then resources/)
//!     → loader.rs (deserialize [[route]] tables)
//!     → rule.rs (compile: pattern.rs nodes, template.rs redirects)
//!     → map.rs (ordered rules for one language)
//!     → store.rs (atomic snapshot of every language)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads a complete new set
//!     → store.rs swaps it in, or keeps the old one on error
//! ```
//!
//! # Design Decisions
//! - Patterns and redirect placeholders are validated at load time
//! - Rules are immutable after compilation; declaration order is preserved
//! - A bad file rejects the whole load rather than dropping single rules

pub mod loader;
pub mod map;
pub mod pattern;
pub mod rule;
pub mod store;
pub mod template;
pub mod watcher;

pub use loader::{load_sitemaps, SitemapError, SitemapSet};
pub use map::Sitemap;
pub use pattern::{Bounds, DynamicPattern, NodePattern, PatternError};
pub use rule::{RedirectKind, RouteRule, RuleConfig, RuleError};
pub use store::{SitemapSource, SitemapStore};
pub use template::{RedirectTemplate, TemplateError};
pub use watcher::SitemapWatcher;
