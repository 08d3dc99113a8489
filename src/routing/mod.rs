//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request ("path?query", relative to web root)
//!     → canonical.rs (decode, slash/language policy)
//!         → Redirect | Home | NotFound | Segments
//!     → router.rs (sitemap lookup for the language)
//!     → matcher.rs (first rule whose nodes all match)
//!     → router.rs (home collapse, rule redirects, view descriptor)
//!     → outcome.rs: RedirectPermanent | RedirectTemporary | View | NotFound
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous: no state survives a request
//! - Deterministic: same input and snapshot always give the same outcome
//! - First match wins (ordered by declaration)

pub mod canonical;
pub mod matcher;
pub mod outcome;
pub mod router;

pub use canonical::{canonicalize, Canonical, RequestTarget};
pub use matcher::{find_match, RouteMatch};
pub use outcome::{Outcome, ViewDescriptor};
pub use router::Router;
