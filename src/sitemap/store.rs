//! Snapshot store for loaded sitemaps.
//!
//! # Design Decisions
//! - The whole language set is one immutable snapshot behind `ArcSwap`
//! - Reloads build a complete new set before publishing it
//! - Readers never observe a partially reloaded set

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::config::SitemapConfig;
use crate::sitemap::loader::{load_sitemaps, SitemapError, SitemapSet};
use crate::sitemap::map::Sitemap;

/// Supplies the ordered rule list for a language.
pub trait SitemapSource: Send + Sync {
    /// Returns `None` if the language has no sitemap.
    fn sitemap(&self, language: &str) -> Option<Arc<Sitemap>>;
}

/// Atomically swappable set of per-language sitemaps.
#[derive(Debug, Default)]
pub struct SitemapStore {
    current: ArcSwap<SitemapSet>,
}

impl SitemapStore {
    pub fn new(set: SitemapSet) -> Self {
        Self {
            current: ArcSwap::from_pointee(set),
        }
    }

    /// Build a store from already compiled sitemaps.
    pub fn from_sitemaps(sitemaps: impl IntoIterator<Item = Sitemap>) -> Self {
        Self::new(
            sitemaps
                .into_iter()
                .map(|sitemap| (sitemap.language().to_string(), Arc::new(sitemap)))
                .collect(),
        )
    }

    /// Load every language from disk into a new store.
    pub fn load(config: &SitemapConfig, languages: &[String]) -> Result<Self, SitemapError> {
        Ok(Self::new(load_sitemaps(config, languages)?))
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<SitemapSet> {
        self.current.load_full()
    }

    /// Publish a new snapshot.
    pub fn replace(&self, set: SitemapSet) {
        self.current.store(Arc::new(set));
    }

    /// Reload from disk. On error the current snapshot stays in place.
    pub fn reload(&self, config: &SitemapConfig, languages: &[String]) -> Result<(), SitemapError> {
        let set = load_sitemaps(config, languages)?;
        tracing::info!(languages = set.len(), "Sitemaps reloaded");
        self.replace(set);
        Ok(())
    }
}

impl SitemapSource for SitemapStore {
    fn sitemap(&self, language: &str) -> Option<Arc<Sitemap>> {
        self.current.load().get(language).cloned()
    }
}

impl<T: SitemapSource + ?Sized> SitemapSource for Arc<T> {
    fn sitemap(&self, language: &str) -> Option<Arc<Sitemap>> {
        (**self).sitemap(language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sitemap::rule::{RouteRule, RuleConfig};

    fn sitemap(language: &str, views: &[&str]) -> Sitemap {
        let rules = views
            .iter()
            .map(|view| {
                RouteRule::compile(RuleConfig {
                    url: view.to_string(),
                    view: Some(view.to_string()),
                    ..RuleConfig::default()
                })
                .unwrap()
            })
            .collect();
        Sitemap::new(language, rules)
    }

    #[test]
    fn test_lookup_by_language() {
        let store = SitemapStore::from_sitemaps([sitemap("en", &["home"]), sitemap("fr", &["home", "contact"])]);
        assert_eq!(store.sitemap("fr").unwrap().len(), 2);
        assert!(store.sitemap("de").is_none());
    }

    #[test]
    fn test_replace_keeps_old_snapshot_alive() {
        let store = SitemapStore::from_sitemaps([sitemap("en", &["home"])]);
        let held = store.sitemap("en").unwrap();

        store.replace(SitemapSet::from([(
            "en".to_string(),
            Arc::new(sitemap("en", &["home", "about"])),
        )]));

        assert_eq!(held.len(), 1);
        assert_eq!(store.sitemap("en").unwrap().len(), 2);
    }

    #[test]
    fn test_concurrent_readers_see_whole_snapshots() {
        let store = Arc::new(SitemapStore::from_sitemaps([sitemap("en", &["a"]), sitemap("fr", &["a"])]));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let snapshot = store.snapshot();
                        let en = snapshot["en"].len();
                        let fr = snapshot["fr"].len();
                        assert_eq!(en, fr);
                    }
                })
            })
            .collect();

        for size in 2..50 {
            let views: Vec<String> = (0..size).map(|i| format!("v{i}")).collect();
            let views: Vec<&str> = views.iter().map(String::as_str).collect();
            store.replace(SitemapSet::from([
                ("en".to_string(), Arc::new(sitemap("en", &views))),
                ("fr".to_string(), Arc::new(sitemap("fr", &views))),
            ]));
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
