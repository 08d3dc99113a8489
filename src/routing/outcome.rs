//! Resolution outcomes.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Everything a view renderer needs about the resolved page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ViewDescriptor {
    pub view: String,
    pub language: String,
    /// Captured dynamic segment values, left to right.
    pub dynamic_url: Vec<String>,
    /// Canonical URL of this page.
    pub url: String,
    /// Decoded request path.
    pub request_url: String,
    /// Raw query string, empty when absent.
    pub request_parameters: String,
    pub web_root: String,
    pub project_title: String,
    pub robots: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_tag: Option<String>,
    pub hidden: bool,
    /// Canonical URL of each literal-routed view in this language.
    pub links: BTreeMap<String, String>,
    #[serde(flatten)]
    pub metadata: BTreeMap<String, Value>,
}

/// Terminal result of resolving one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
    /// HTTP 301 to `url`.
    RedirectPermanent { url: String },
    /// HTTP 302 to `url`.
    RedirectTemporary { url: String },
    /// Render the described view.
    View(ViewDescriptor),
    /// Render the not-found view with HTTP 404.
    NotFound { language: String },
}

impl Outcome {
    /// HTTP status code the serving layer should emit.
    pub fn status(&self) -> u16 {
        match self {
            Outcome::RedirectPermanent { .. } => 301,
            Outcome::RedirectTemporary { .. } => 302,
            Outcome::View(_) => 200,
            Outcome::NotFound { .. } => 404,
        }
    }

    /// Redirect target, if this is a redirect.
    pub fn location(&self) -> Option<&str> {
        match self {
            Outcome::RedirectPermanent { url } | Outcome::RedirectTemporary { url } => Some(url),
            _ => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::RedirectPermanent { .. } => "redirect_permanent",
            Outcome::RedirectTemporary { .. } => "redirect_temporary",
            Outcome::View(_) => "view",
            Outcome::NotFound { .. } => "not_found",
        }
    }
}
