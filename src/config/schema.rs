//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the sitemap router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// URL policy consumed by the router on every request.
    pub site: SiteSettings,

    /// Where per-language sitemap files live.
    pub sitemap: SitemapConfig,

    /// Listener configuration for the serving adapter.
    pub listener: ListenerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Site-wide URL policy.
///
/// Passed by value into the router; nothing reads it from ambient state.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Supported language codes. The first entry is the default unless
    /// `default_language` says otherwise.
    pub languages: Vec<String>,

    /// Explicit default language (must be one of `languages`).
    pub default_language: Option<String>,

    /// Prefix every generated URL starts with (e.g. "/" or "/site/").
    pub web_root: String,

    /// View rendered for the language root.
    pub home_view: String,

    /// View rendered for every 404 outcome.
    pub not_found_view: String,

    /// Default project title handed to views.
    pub project_title: String,

    /// Default robots directive handed to views.
    pub robots: String,

    /// Redirect non-root URLs that lack a trailing slash.
    pub enforce_trailing_slash: bool,

    /// Require a language segment even for the default language.
    pub enforce_first_language_in_url: bool,
}

impl SiteSettings {
    /// The language used when the request does not carry one.
    pub fn default_language(&self) -> &str {
        self.default_language
            .as_deref()
            .or_else(|| self.languages.first().map(String::as_str))
            .unwrap_or_default()
    }

    /// Returns true if `code` is a configured language.
    pub fn is_language(&self, code: &str) -> bool {
        self.languages.iter().any(|l| l == code)
    }

    /// Language-aware root URL: the web root itself for the default language
    /// when the language segment is optional, `web_root + language + "/"`
    /// otherwise.
    pub fn language_root(&self, language: &str) -> String {
        if !self.enforce_first_language_in_url && language == self.default_language() {
            self.web_root.clone()
        } else {
            format!("{}{}/", self.web_root, language)
        }
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            default_language: None,
            web_root: "/".to_string(),
            home_view: "home".to_string(),
            not_found_view: "404".to_string(),
            project_title: String::new(),
            robots: String::new(),
            enforce_trailing_slash: true,
            enforce_first_language_in_url: false,
        }
    }
}

/// Sitemap file locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Directory holding `{language}.sitemap.toml` files.
    pub resources_dir: String,

    /// Directory whose files take precedence over `resources_dir`.
    pub overrides_dir: String,

    /// Reload sitemaps when files change.
    pub watch: bool,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            resources_dir: "resources".to_string(),
            overrides_dir: "overrides/resources".to_string(),
            watch: false,
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
