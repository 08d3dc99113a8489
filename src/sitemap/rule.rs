//! Route rules.
//!
//! # Responsibilities
//! - Deserialize `[[route]]` tables from sitemap files
//! - Compile them into immutable [`RouteRule`]s (patterns parsed, templates checked)
//! - Match a rule against request segments

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::sitemap::pattern::{NodePattern, PatternError};
use crate::sitemap::template::{RedirectTemplate, TemplateError};

/// A `[[route]]` table as written in a sitemap file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleConfig {
    /// Node patterns joined by `/`.
    pub url: String,

    pub view: Option<String>,

    pub permanent_redirect: Option<String>,

    pub temporary_redirect: Option<String>,

    pub cache_tag: Option<String>,

    #[serde(default)]
    pub cache_tag_dynamic: bool,

    pub meta_title: Option<String>,

    pub robots: Option<String>,

    pub project_title: Option<String>,

    /// Passed through to the renderer; does not affect routing or links.
    #[serde(default)]
    pub hidden: bool,

    /// View-specific keys, passed through untouched.
    #[serde(flatten)]
    pub metadata: BTreeMap<String, Value>,
}

/// Why a rule failed to compile.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid url pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("invalid redirect target: {0}")]
    Template(#[from] TemplateError),
}

/// Redirect status class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    Permanent,
    Temporary,
}

/// Compiled redirect declared on a rule.
#[derive(Debug, Clone)]
pub struct RuleRedirect {
    pub kind: RedirectKind,
    pub target: RedirectTemplate,
}

/// A compiled sitemap entry.
#[derive(Debug, Clone)]
pub struct RouteRule {
    /// The `url` the rule was declared with; identifies it in logs.
    pub key: String,
    pub nodes: Vec<NodePattern>,
    pub view: Option<String>,
    pub redirect: Option<RuleRedirect>,
    pub cache_tag: Option<String>,
    pub cache_tag_dynamic: bool,
    pub meta_title: Option<String>,
    pub robots: Option<String>,
    pub project_title: Option<String>,
    pub hidden: bool,
    pub metadata: BTreeMap<String, Value>,
}

impl RouteRule {
    /// Compile a rule. A temporary redirect wins over a permanent one.
    pub fn compile(config: RuleConfig) -> Result<Self, RuleError> {
        let nodes = NodePattern::parse_all(&config.url)?;
        let captures = nodes.iter().filter(|n| n.is_dynamic()).count();

        let redirect = match (non_empty(config.temporary_redirect), non_empty(config.permanent_redirect)) {
            (Some(target), _) => Some(RuleRedirect {
                kind: RedirectKind::Temporary,
                target: RedirectTemplate::parse(&target, captures)?,
            }),
            (None, Some(target)) => Some(RuleRedirect {
                kind: RedirectKind::Permanent,
                target: RedirectTemplate::parse(&target, captures)?,
            }),
            (None, None) => None,
        };

        Ok(Self {
            key: config.url,
            nodes,
            view: non_empty(config.view),
            redirect,
            cache_tag: config.cache_tag,
            cache_tag_dynamic: config.cache_tag_dynamic,
            meta_title: config.meta_title,
            robots: config.robots,
            project_title: config.project_title,
            hidden: config.hidden,
            metadata: config.metadata,
        })
    }

    /// Rule carrying only a view, used when the home view has no entry.
    pub fn synthesized(view: &str) -> Self {
        Self {
            key: String::new(),
            nodes: Vec::new(),
            view: Some(view.to_string()),
            redirect: None,
            cache_tag: None,
            cache_tag_dynamic: false,
            meta_title: None,
            robots: None,
            project_title: None,
            hidden: false,
            metadata: BTreeMap::new(),
        }
    }

    /// Match against request segments, returning captured dynamic values
    /// in left-to-right order. `folded` holds the lowercased segments.
    pub fn capture(&self, segments: &[String], folded: &[String]) -> Option<Vec<String>> {
        if self.nodes.len() != segments.len() {
            return None;
        }

        let mut captured = Vec::new();
        for ((node, segment), lower) in self.nodes.iter().zip(segments).zip(folded) {
            match node {
                NodePattern::Literal(text) => {
                    if text != lower {
                        return None;
                    }
                }
                NodePattern::Dynamic(pattern) => {
                    if !pattern.matches(segment) {
                        return None;
                    }
                    captured.push(segment.clone());
                }
            }
        }
        Some(captured)
    }

    /// True if every node is a literal.
    pub fn is_literal(&self) -> bool {
        !self.nodes.iter().any(NodePattern::is_dynamic)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
