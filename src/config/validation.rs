//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the language list and default language agree
//! - Check web root and view names are usable in URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::RouterConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("site.languages must not be empty")]
    NoLanguages,

    #[error("site.languages contains an invalid code {0:?}")]
    InvalidLanguage(String),

    #[error("site.languages lists {0:?} more than once")]
    DuplicateLanguage(String),

    #[error("site.default_language {0:?} is not one of site.languages")]
    UnknownDefaultLanguage(String),

    #[error("site.web_root {0:?} must start and end with '/'")]
    InvalidWebRoot(String),

    #[error("site.{0} must not be empty")]
    EmptyView(&'static str),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration, collecting every violation.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let site = &config.site;

    if site.languages.is_empty() {
        errors.push(ValidationError::NoLanguages);
    }

    let mut seen = HashSet::new();
    for code in &site.languages {
        // Language codes become the first URL segment.
        if code.is_empty() || code.contains('/') || code.contains('?') {
            errors.push(ValidationError::InvalidLanguage(code.clone()));
        }
        if !seen.insert(code.as_str()) {
            errors.push(ValidationError::DuplicateLanguage(code.clone()));
        }
    }

    if let Some(default) = &site.default_language {
        if !site.is_language(default) {
            errors.push(ValidationError::UnknownDefaultLanguage(default.clone()));
        }
    }

    if !site.web_root.starts_with('/') || !site.web_root.ends_with('/') {
        errors.push(ValidationError::InvalidWebRoot(site.web_root.clone()));
    }

    if site.home_view.is_empty() {
        errors.push(ValidationError::EmptyView("home_view"));
    }
    if site.not_found_view.is_empty() {
        errors.push(ValidationError::EmptyView("not_found_view"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
