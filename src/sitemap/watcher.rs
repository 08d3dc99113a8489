//! Sitemap directory watcher for hot reload.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SitemapConfig;
use crate::sitemap::store::SitemapStore;

/// A watcher that reloads the store when sitemap files change.
pub struct SitemapWatcher {
    config: SitemapConfig,
    languages: Vec<String>,
    store: Arc<SitemapStore>,
}

impl SitemapWatcher {
    /// Create a new SitemapWatcher publishing into `store`.
    pub fn new(config: SitemapConfig, languages: Vec<String>, store: Arc<SitemapStore>) -> Self {
        Self {
            config,
            languages,
            store,
        }
    }

    /// Start watching in a background thread.
    ///
    /// The returned handle must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let config = self.config.clone();
        let languages = self.languages.clone();
        let store = self.store.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                        tracing::info!(paths = ?event.paths, "Sitemap change detected, reloading...");
                        if let Err(e) = store.reload(&config, &languages) {
                            tracing::error!(
                                "Failed to reload sitemaps: {}. Keeping current sitemaps.",
                                e
                            );
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        for dir in [&self.config.resources_dir, &self.config.overrides_dir] {
            let dir = Path::new(dir);
            if dir.is_dir() {
                watcher.watch(dir, RecursiveMode::NonRecursive)?;
                tracing::info!(path = ?dir, "Sitemap watcher started");
            }
        }

        Ok(watcher)
    }
}
