//! One language's ordered rule list.

use std::collections::BTreeMap;

use crate::config::SiteSettings;
use crate::sitemap::rule::RouteRule;

/// Immutable, ordered rules for a single language.
#[derive(Debug, Clone)]
pub struct Sitemap {
    language: String,
    rules: Vec<RouteRule>,
}

impl Sitemap {
    pub fn new(language: impl Into<String>, rules: Vec<RouteRule>) -> Self {
        Self {
            language: language.into(),
            rules,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule rendering `home_view`.
    pub fn home_rule(&self, home_view: &str) -> Option<&RouteRule> {
        self.rules
            .iter()
            .find(|rule| rule.view.as_deref() == Some(home_view))
    }

    /// Canonical URL of every view reachable through a fully literal rule,
    /// keyed by view name. The first declaration of a view wins.
    pub fn links(&self, settings: &SiteSettings) -> BTreeMap<String, String> {
        let root = settings.language_root(&self.language);
        let mut links = BTreeMap::new();

        for rule in self.rules.iter().filter(|rule| rule.is_literal()) {
            let Some(view) = &rule.view else { continue };
            if links.contains_key(view) {
                continue;
            }
            let url = if *view == settings.home_view || rule.nodes.is_empty() {
                root.clone()
            } else {
                format!("{}{}/", root, rule.key.trim_matches('/'))
            };
            links.insert(view.clone(), url);
        }

        links
    }
}
