//! Language detection and URL canonicalization.
//!
//! # Responsibilities
//! - Split the raw request into path nodes and query string
//! - Enforce the trailing slash and language-prefix policies via 301s
//! - Reduce the path to the segments the matcher sees
//!
//! # Design Decisions
//! - The path is split on `/` before percent-decoding, so `%2F` stays inside its node
//! - Any empty node other than the last is a 404, checked before any redirect
//! - Redirect targets are re-encoded; decoded text is only used for matching
//! - Every redirect keeps the query string unless the target already has one

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteSettings;
use crate::routing::outcome::Outcome;

/// Bytes escaped when a decoded node is written back into a URL path.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A request split into path nodes and query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    /// Percent-decoded path, relative to the web root.
    pub path: String,
    /// Decoded `/`-separated nodes after the leading slash. A trailing
    /// slash leaves a final empty node; the root has none.
    pub nodes: Vec<String>,
    /// Raw query string, `None` when absent or empty.
    pub query: Option<String>,
}

impl RequestTarget {
    pub fn parse(raw: &str) -> Self {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw, None),
        };

        let relative = path.strip_prefix('/').unwrap_or(path);
        let nodes = if relative.is_empty() {
            Vec::new()
        } else {
            relative.split('/').map(decode).collect()
        };

        Self {
            path: decode(path),
            nodes,
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
        }
    }

    /// Percent-encoded path without its leading slash.
    pub fn relative_path(&self) -> String {
        encode_nodes(&self.nodes)
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

fn encode_nodes(nodes: &[String]) -> String {
    nodes
        .iter()
        .map(|node| utf8_percent_encode(node, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Result of the canonicalization pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Canonical {
    /// The request is not canonical; send the client elsewhere.
    Redirect(Outcome),
    /// The language root.
    Home { language: String },
    /// Segments to hand to the matcher.
    Segments { language: String, segments: Vec<String> },
    /// The path can never match (e.g. `a//b`).
    NotFound { language: String },
}

/// Append `query` to `url` unless `url` already has a query component.
pub fn with_query(url: String, query: Option<&str>) -> String {
    match query {
        Some(query) if !url.contains('?') => format!("{url}?{query}"),
        _ => url,
    }
}

fn permanent(url: String, request: &RequestTarget) -> Canonical {
    Canonical::Redirect(Outcome::RedirectPermanent {
        url: with_query(url, request.query.as_deref()),
    })
}

/// Apply the language and slash policies to `request`.
pub fn canonicalize(request: &RequestTarget, settings: &SiteSettings) -> Canonical {
    let default_language = settings.default_language();
    let nodes = request.nodes.as_slice();

    let Some((last, inner)) = nodes.split_last() else {
        if settings.enforce_first_language_in_url {
            return permanent(format!("{}{}/", settings.web_root, default_language), request);
        }
        return Canonical::Home {
            language: default_language.to_string(),
        };
    };

    if inner.iter().any(String::is_empty) {
        let language = nodes
            .first()
            .filter(|first| settings.is_language(first))
            .map_or(default_language, String::as_str);
        return Canonical::NotFound {
            language: language.to_string(),
        };
    }

    if settings.enforce_trailing_slash && !last.is_empty() {
        return permanent(format!("{}{}/", settings.web_root, encode_nodes(nodes)), request);
    }

    let (language, rest) = match nodes.split_first() {
        Some((first, rest)) if settings.is_language(first) => {
            if !settings.enforce_first_language_in_url && first == default_language {
                return permanent(format!("{}{}", settings.web_root, encode_nodes(rest)), request);
            }
            (first.clone(), rest)
        }
        _ if settings.enforce_first_language_in_url => {
            return permanent(
                format!("{}{}/{}", settings.web_root, default_language, encode_nodes(nodes)),
                request,
            );
        }
        _ => (default_language.to_string(), nodes),
    };

    let segments: Vec<String> = rest.iter().filter(|node| !node.is_empty()).cloned().collect();

    if segments.is_empty() {
        Canonical::Home { language }
    } else {
        Canonical::Segments { language, segments }
    }
}
