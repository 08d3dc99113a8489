//! Sitemap loading from disk.
//!
//! Each language reads `{language}.sitemap.toml`, from the overrides
//! directory when present there and from the resources directory otherwise.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::config::SitemapConfig;
use crate::observability::metrics;
use crate::sitemap::map::Sitemap;
use crate::sitemap::rule::{RouteRule, RuleConfig, RuleError};

/// Every loaded language, keyed by language code.
pub type SitemapSet = HashMap<String, Arc<Sitemap>>;

/// Error type for sitemap loading.
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{}: route #{index} ({url:?}): {source}", .path.display())]
    Rule {
        path: PathBuf,
        index: usize,
        url: String,
        #[source]
        source: RuleError,
    },
}

#[derive(Debug, Deserialize)]
struct SitemapFile {
    #[serde(default)]
    route: Vec<RuleConfig>,
}

/// File name holding the rules of `language`.
pub fn sitemap_file_name(language: &str) -> String {
    format!("{language}.sitemap.toml")
}

/// Resolve which file serves `language`, preferring the override.
pub fn sitemap_path(config: &SitemapConfig, language: &str) -> Option<PathBuf> {
    let file_name = sitemap_file_name(language);
    [&config.overrides_dir, &config.resources_dir]
        .into_iter()
        .map(|dir| Path::new(dir).join(&file_name))
        .find(|path| path.is_file())
}

/// Parse and compile one sitemap file's contents.
pub fn parse_sitemap(language: &str, content: &str, path: &Path) -> Result<Sitemap, SitemapError> {
    let file: SitemapFile = toml::from_str(content).map_err(|source| SitemapError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let rules = file
        .route
        .into_iter()
        .enumerate()
        .map(|(index, config)| {
            let url = config.url.clone();
            RouteRule::compile(config).map_err(|source| SitemapError::Rule {
                path: path.to_path_buf(),
                index,
                url,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Sitemap::new(language, rules))
}

/// Load every language that has a sitemap file.
///
/// Languages without a file are skipped; resolving them yields a 404.
/// Any unreadable or invalid file fails the whole load.
pub fn load_sitemaps(config: &SitemapConfig, languages: &[String]) -> Result<SitemapSet, SitemapError> {
    let mut set = SitemapSet::new();

    for language in languages {
        let Some(path) = sitemap_path(config, language) else {
            tracing::warn!(language = %language, "No sitemap file found for language");
            continue;
        };

        let content = fs::read_to_string(&path).map_err(|source| SitemapError::Io {
            path: path.clone(),
            source,
        })?;
        let sitemap = parse_sitemap(language, &content, &path)?;

        tracing::info!(
            language = %language,
            path = %path.display(),
            rules = sitemap.len(),
            "Sitemap loaded"
        );
        metrics::record_sitemap_rules(language, sitemap.len());

        set.insert(language.clone(), Arc::new(sitemap));
    }

    Ok(set)
}
