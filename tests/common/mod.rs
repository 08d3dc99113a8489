//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sitemap_router::config::{SiteSettings, SitemapConfig};
use sitemap_router::routing::Router;
use sitemap_router::sitemap::loader::parse_sitemap;
use sitemap_router::sitemap::SitemapStore;
use sitemap_router::{Outcome, ViewDescriptor};

/// Two languages, English first, default flags.
pub fn settings() -> SiteSettings {
    SiteSettings {
        languages: vec!["en".into(), "fr".into()],
        project_title: "Example site".into(),
        robots: "index,follow".into(),
        ..SiteSettings::default()
    }
}

/// Build a router from inline `(language, toml)` sitemaps.
pub fn router(settings: SiteSettings, sitemaps: &[(&str, &str)]) -> Router<Arc<SitemapStore>> {
    let compiled = sitemaps.iter().map(|(language, content)| {
        parse_sitemap(language, content, Path::new(&format!("{language}.sitemap.toml"))).unwrap()
    });
    Router::new(settings, Arc::new(SitemapStore::from_sitemaps(compiled)))
}

/// The sample sitemaps shipped under `resources/`.
pub fn sample_router(settings: SiteSettings) -> Router<Arc<SitemapStore>> {
    let config = SitemapConfig {
        resources_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/resources").to_string(),
        overrides_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/overrides/resources").to_string(),
        watch: false,
    };
    let store = SitemapStore::load(&config, &settings.languages).unwrap();
    Router::new(settings, Arc::new(store))
}

pub fn expect_view(outcome: Outcome) -> ViewDescriptor {
    match outcome {
        Outcome::View(descriptor) => descriptor,
        other => panic!("expected a view descriptor, got {other:?}"),
    }
}

pub fn permanent(url: &str) -> Outcome {
    Outcome::RedirectPermanent { url: url.into() }
}

pub fn not_found(language: &str) -> Outcome {
    Outcome::NotFound {
        language: language.into(),
    }
}

/// Write `content` to `dir/name`, creating `dir` as needed.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
