//! Request resolution.
//!
//! # Responsibilities
//! - Run the canonicalization pass
//! - Look up the sitemap of the resolved language
//! - Match segments and turn the matched rule into an outcome
//!
//! # Design Decisions
//! - Infallible: every input maps to one of the four outcomes
//! - Settings are owned by the router; sitemaps come from a `SitemapSource`
//! - One sitemap snapshot is used for the whole request

use std::sync::Arc;

use crate::config::SiteSettings;
use crate::observability::metrics;
use crate::routing::canonical::{canonicalize, with_query, Canonical, RequestTarget};
use crate::routing::matcher::find_match;
use crate::routing::outcome::{Outcome, ViewDescriptor};
use crate::sitemap::{RedirectKind, RouteRule, Sitemap, SitemapSource};

/// Resolves request URLs to outcomes.
#[derive(Debug)]
pub struct Router<S> {
    settings: SiteSettings,
    sitemaps: S,
}

impl<S: SitemapSource> Router<S> {
    pub fn new(settings: SiteSettings, sitemaps: S) -> Self {
        Self { settings, sitemaps }
    }

    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    /// Resolve a raw request (`path[?query]`, relative to the web root).
    pub fn resolve(&self, raw: &str) -> Outcome {
        let request = RequestTarget::parse(raw);
        let outcome = self.resolve_target(&request);

        tracing::debug!(
            request = %raw,
            outcome = outcome.label(),
            status = outcome.status(),
            "Request resolved"
        );
        metrics::record_resolution(outcome.label());

        outcome
    }

    /// Resolve a request that may be missing entirely.
    pub fn resolve_optional(&self, raw: Option<&str>) -> Outcome {
        match raw {
            Some(raw) => self.resolve(raw),
            None => {
                tracing::debug!("No request path provided");
                metrics::record_resolution("not_found");
                self.not_found(self.settings.default_language())
            }
        }
    }

    fn resolve_target(&self, request: &RequestTarget) -> Outcome {
        match canonicalize(request, &self.settings) {
            Canonical::Redirect(outcome) => outcome,
            Canonical::NotFound { language } => self.not_found(&language),
            Canonical::Home { language } => {
                let Some(sitemap) = self.sitemap(&language) else {
                    return self.not_found(&language);
                };
                let home_view = &self.settings.home_view;
                match sitemap.home_rule(home_view) {
                    Some(rule) => self.finish(request, &sitemap, rule, Vec::new()),
                    None => {
                        let rule = RouteRule::synthesized(home_view);
                        self.finish(request, &sitemap, &rule, Vec::new())
                    }
                }
            }
            Canonical::Segments { language, segments } => {
                let Some(sitemap) = self.sitemap(&language) else {
                    return self.not_found(&language);
                };
                let Some(matched) = find_match(sitemap.rules(), &segments) else {
                    tracing::debug!(language = %language, ?segments, "No rule matched");
                    return self.not_found(&language);
                };

                tracing::debug!(rule = %matched.rule.key, dynamic_url = ?matched.dynamic_url, "Rule matched");

                // The home view has exactly one URL: its language root.
                if matched.dynamic_url.is_empty()
                    && matched.rule.view.as_deref() == Some(self.settings.home_view.as_str())
                {
                    return Outcome::RedirectPermanent {
                        url: with_query(self.settings.language_root(&language), request.query.as_deref()),
                    };
                }

                self.finish(request, &sitemap, matched.rule, matched.dynamic_url)
            }
        }
    }

    fn sitemap(&self, language: &str) -> Option<Arc<Sitemap>> {
        let sitemap = self.sitemaps.sitemap(language);
        if sitemap.is_none() {
            tracing::debug!(language = %language, "No sitemap for language");
        }
        sitemap
    }

    fn finish(
        &self,
        request: &RequestTarget,
        sitemap: &Sitemap,
        rule: &RouteRule,
        dynamic_url: Vec<String>,
    ) -> Outcome {
        if let Some(redirect) = &rule.redirect {
            let target = redirect.target.render(&dynamic_url);
            let url = if redirect.target.has_query() {
                target
            } else {
                with_query(target, request.query.as_deref())
            };
            return match redirect.kind {
                RedirectKind::Temporary => Outcome::RedirectTemporary { url },
                RedirectKind::Permanent => Outcome::RedirectPermanent { url },
            };
        }

        let Some(view) = rule.view.clone() else {
            tracing::warn!(rule = %rule.key, "Matched rule defines no view");
            return self.not_found(sitemap.language());
        };

        let cache_tag = rule.cache_tag.as_ref().map(|base| {
            if rule.cache_tag_dynamic && !dynamic_url.is_empty() {
                format!("{}-{}", base, dynamic_url.join("-"))
            } else {
                base.clone()
            }
        });

        Outcome::View(ViewDescriptor {
            view,
            language: sitemap.language().to_string(),
            dynamic_url,
            url: format!("{}{}", self.settings.web_root, request.relative_path()),
            request_url: request.path.clone(),
            request_parameters: request.query.clone().unwrap_or_default(),
            web_root: self.settings.web_root.clone(),
            project_title: rule
                .project_title
                .clone()
                .unwrap_or_else(|| self.settings.project_title.clone()),
            robots: rule
                .robots
                .clone()
                .unwrap_or_else(|| self.settings.robots.clone()),
            meta_title: rule.meta_title.clone(),
            cache_tag,
            hidden: rule.hidden,
            links: sitemap.links(&self.settings),
            metadata: rule.metadata.clone(),
        })
    }

    fn not_found(&self, language: &str) -> Outcome {
        Outcome::NotFound {
            language: language.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::{RuleConfig, SitemapStore};

    fn route(url: &str, view: &str) -> RuleConfig {
        RuleConfig {
            url: url.into(),
            view: Some(view.into()),
            ..RuleConfig::default()
        }
    }

    fn sitemap(language: &str, configs: Vec<RuleConfig>) -> Sitemap {
        Sitemap::new(
            language,
            configs.into_iter().map(|c| RouteRule::compile(c).unwrap()).collect(),
        )
    }

    fn settings() -> SiteSettings {
        SiteSettings {
            languages: vec!["en".into(), "fr".into()],
            project_title: "Example".into(),
            robots: "noindex".into(),
            ..SiteSettings::default()
        }
    }

    fn router(configs: Vec<RuleConfig>) -> Router<SitemapStore> {
        Router::new(settings(), SitemapStore::from_sitemaps([sitemap("en", configs)]))
    }

    fn view(outcome: Outcome) -> ViewDescriptor {
        match outcome {
            Outcome::View(descriptor) => descriptor,
            other => panic!("expected a view, got {other:?}"),
        }
    }

    #[test]
    fn test_root_resolves_home_rule() {
        let mut home = route("home", "home");
        home.meta_title = Some("Home!".into());
        let descriptor = view(router(vec![home]).resolve("/"));

        assert_eq!(descriptor.view, "home");
        assert_eq!(descriptor.language, "en");
        assert!(descriptor.dynamic_url.is_empty());
        assert_eq!(descriptor.meta_title.as_deref(), Some("Home!"));
        assert_eq!(descriptor.url, "/");
    }

    #[test]
    fn test_root_without_home_rule_is_synthesized() {
        let descriptor = view(router(vec![route("about", "about")]).resolve(""));
        assert_eq!(descriptor.view, "home");
        assert_eq!(descriptor.project_title, "Example");
    }

    #[test]
    fn test_home_rule_url_collapses_to_root() {
        let r = router(vec![route("home", "home")]);
        assert_eq!(r.resolve("/home/"), Outcome::RedirectPermanent { url: "/".into() });
        assert_eq!(r.resolve("/home/?a=b"), Outcome::RedirectPermanent { url: "/?a=b".into() });
    }

    #[test]
    fn test_temporary_redirect_substitutes_captures() {
        let mut old = route("old/:numeric:", "unused");
        old.temporary_redirect = Some("/new/:0:".into());
        let r = router(vec![old]);

        assert_eq!(r.resolve("/old/123/"), Outcome::RedirectTemporary { url: "/new/123".into() });
        assert_eq!(r.resolve("/old/123/?x=1"), Outcome::RedirectTemporary { url: "/new/123?x=1".into() });
    }

    #[test]
    fn test_redirect_with_own_query_drops_request_query() {
        let mut search = route("find/:alpha:", "unused");
        search.permanent_redirect = Some("/search/?q=:0:".into());
        let r = router(vec![search]);

        assert_eq!(r.resolve("/find/cats/?page=2"), Outcome::RedirectPermanent { url: "/search/?q=cats".into() });
    }

    #[test]
    fn test_rule_without_view_is_not_found() {
        let r = router(vec![RuleConfig {
            url: "orphan".into(),
            ..RuleConfig::default()
        }]);
        assert_eq!(r.resolve("/orphan/"), Outcome::NotFound { language: "en".into() });
    }

    #[test]
    fn test_unmatched_is_not_found_with_language() {
        let store = SitemapStore::from_sitemaps([sitemap("en", vec![]), sitemap("fr", vec![route("contact", "contact")])]);
        let r = Router::new(settings(), store);
        assert_eq!(r.resolve("/fr/nothing/"), Outcome::NotFound { language: "fr".into() });
        assert_eq!(r.resolve("/fr/contact/").status(), 200);
    }

    #[test]
    fn test_missing_sitemap_is_not_found() {
        let r = router(vec![route("contact", "contact")]);
        assert_eq!(r.resolve("/fr/contact/"), Outcome::NotFound { language: "fr".into() });
        assert_eq!(r.resolve("/fr/"), Outcome::NotFound { language: "fr".into() });
    }

    #[test]
    fn test_missing_request_is_not_found() {
        let r = router(vec![route("home", "home")]);
        assert_eq!(r.resolve_optional(None), Outcome::NotFound { language: "en".into() });
    }

    #[test]
    fn test_descriptor_fields() {
        let mut photo = route("photos/:numeric:/:alpha:", "photo");
        photo.cache_tag = Some("photo".into());
        photo.cache_tag_dynamic = true;
        photo.robots = Some("index".into());
        photo.metadata.insert("layout".into(), "wide".into());
        let r = router(vec![route("home", "home"), route("contact", "contact"), photo]);

        let descriptor = view(r.resolve("/photos/42/Sunset/?size=big"));
        assert_eq!(descriptor.view, "photo");
        assert_eq!(descriptor.dynamic_url, vec!["42", "Sunset"]);
        assert_eq!(descriptor.cache_tag.as_deref(), Some("photo-42-Sunset"));
        assert_eq!(descriptor.request_url, "/photos/42/Sunset/");
        assert_eq!(descriptor.request_parameters, "size=big");
        assert_eq!(descriptor.url, "/photos/42/Sunset/");
        assert_eq!(descriptor.robots, "index");
        assert_eq!(descriptor.project_title, "Example");
        assert_eq!(descriptor.metadata["layout"], "wide");
        assert_eq!(descriptor.links["contact"], "/contact/");
        assert_eq!(descriptor.links["home"], "/");
    }

    #[test]
    fn test_static_cache_tag() {
        let mut about = route("about", "about");
        about.cache_tag = Some("about".into());
        about.cache_tag_dynamic = true;
        let descriptor = view(router(vec![about]).resolve("/about/"));
        assert_eq!(descriptor.cache_tag.as_deref(), Some("about"));
    }
}
