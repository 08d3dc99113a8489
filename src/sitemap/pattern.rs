//! Segment patterns.
//!
//! A rule URL such as `photos/:numeric:1-*:/:alpha:` is split on `/` and
//! each node is parsed into a [`NodePattern`]:
//!
//! ```text
//! photos                  literal, case-insensitive
//! :numeric:  :numeric:1-10:        digits, optional value range
//! :alpha:    :alpha:2-*:           letters plus '-' and '_', optional length range
//! :alphanumeric:  :alphanumeric:3-8:
//! :fixed:red,green,blue:           one of a literal set (`:fixed::` never matches)
//! :any:      :any:a-z0-9.:         wildcard, or a regular character class
//! ```
//!
//! Ranges are `min-max` where either side may be `*`.

use regex::Regex;
use thiserror::Error;

/// Errors raised while parsing a node.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("empty node in {0:?}")]
    EmptyNode(String),

    #[error("unknown dynamic node kind {0:?}")]
    UnknownKind(String),

    #[error("invalid range {0:?}, expected `min-max` with `*` for an open side")]
    InvalidRange(String),

    #[error("range {0:?} has its minimum above its maximum")]
    InvertedRange(String),

    #[error("invalid character class {class:?}: {source}")]
    CharClass {
        class: String,
        #[source]
        source: regex::Error,
    },
}

/// Inclusive bounds, either side optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl Bounds {
    /// No constraint on either side.
    pub const UNBOUNDED: Bounds = Bounds { min: None, max: None };

    fn parse(text: &str) -> Result<Self, PatternError> {
        let (min, max) = text
            .split_once('-')
            .ok_or_else(|| PatternError::InvalidRange(text.to_string()))?;

        let side = |s: &str| -> Result<Option<u64>, PatternError> {
            match s.trim() {
                "*" => Ok(None),
                n => n
                    .parse()
                    .map(Some)
                    .map_err(|_| PatternError::InvalidRange(text.to_string())),
            }
        };

        let bounds = Bounds { min: side(min)?, max: side(max)? };
        if let (Some(lo), Some(hi)) = (bounds.min, bounds.max) {
            if lo > hi {
                return Err(PatternError::InvertedRange(text.to_string()));
            }
        }
        Ok(bounds)
    }

    pub fn contains(&self, value: u64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Capturing node pattern.
#[derive(Debug, Clone)]
pub enum DynamicPattern {
    /// ASCII digits; bounds constrain the integer value.
    Numeric(Bounds),
    /// Unicode letters, `-` and `_`; bounds constrain the length in characters.
    Alpha(Bounds),
    /// Unicode letters and digits, `-` and `_`; bounds constrain the length.
    Alphanumeric(Bounds),
    /// Exact member of the set.
    Fixed(Vec<String>),
    /// Anything, or whole-segment match of a compiled character class.
    Any(Option<Regex>),
}

impl DynamicPattern {
    pub fn matches(&self, segment: &str) -> bool {
        match self {
            DynamicPattern::Numeric(bounds) => {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return false;
                }
                // Digit strings too long for u64 sit above any finite maximum.
                let value = segment.parse::<u64>().unwrap_or(u64::MAX);
                bounds.contains(value)
            }
            DynamicPattern::Alpha(bounds) => {
                word_matches(segment, bounds, |c| c.is_alphabetic())
            }
            DynamicPattern::Alphanumeric(bounds) => {
                word_matches(segment, bounds, |c| c.is_alphanumeric())
            }
            DynamicPattern::Fixed(set) => set.iter().any(|member| member == segment),
            DynamicPattern::Any(None) => true,
            DynamicPattern::Any(Some(class)) => class.is_match(segment),
        }
    }
}

fn word_matches(segment: &str, bounds: &Bounds, class: impl Fn(char) -> bool) -> bool {
    let mut len = 0u64;
    for c in segment.chars() {
        if !(class(c) || c == '-' || c == '_') {
            return false;
        }
        len += 1;
    }
    len > 0 && bounds.contains(len)
}

/// One node of a route rule.
#[derive(Debug, Clone)]
pub enum NodePattern {
    /// Matched case-insensitively; stored lowercased.
    Literal(String),
    Dynamic(DynamicPattern),
}

impl NodePattern {
    /// Parse a single node of a rule URL.
    pub fn parse(node: &str) -> Result<Self, PatternError> {
        if node.is_empty() {
            return Err(PatternError::EmptyNode(node.to_string()));
        }

        let inner = match node
            .strip_prefix(':')
            .and_then(|rest| rest.strip_suffix(':'))
        {
            Some(inner) if !inner.is_empty() => inner,
            _ => return Ok(NodePattern::Literal(node.to_lowercase())),
        };

        let (kind, argument) = match inner.split_once(':') {
            Some((kind, argument)) => (kind, Some(argument)),
            None => (inner, None),
        };

        let pattern = match kind {
            "numeric" => DynamicPattern::Numeric(parse_bounds(argument)?),
            "alpha" => DynamicPattern::Alpha(parse_bounds(argument)?),
            "alphanumeric" => DynamicPattern::Alphanumeric(parse_bounds(argument)?),
            "fixed" => DynamicPattern::Fixed(
                argument
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|member| !member.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            "any" => match argument.filter(|class| !class.is_empty()) {
                None => DynamicPattern::Any(None),
                Some(class) => {
                    let regex = Regex::new(&format!("^[{class}]+$")).map_err(|source| {
                        PatternError::CharClass {
                            class: class.to_string(),
                            source,
                        }
                    })?;
                    DynamicPattern::Any(Some(regex))
                }
            },
            other => return Err(PatternError::UnknownKind(other.to_string())),
        };

        Ok(NodePattern::Dynamic(pattern))
    }

    /// Parse a whole rule URL (`a/:numeric:/c`). Leading and trailing
    /// slashes are ignored.
    pub fn parse_all(url: &str) -> Result<Vec<Self>, PatternError> {
        let trimmed = url.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        trimmed
            .split('/')
            .map(|node| {
                if node.is_empty() {
                    Err(PatternError::EmptyNode(url.to_string()))
                } else {
                    NodePattern::parse(node)
                }
            })
            .collect()
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, NodePattern::Dynamic(_))
    }

    /// Literal text, if this node is a literal.
    pub fn literal(&self) -> Option<&str> {
        match self {
            NodePattern::Literal(text) => Some(text),
            NodePattern::Dynamic(_) => None,
        }
    }
}

fn parse_bounds(argument: Option<&str>) -> Result<Bounds, PatternError> {
    match argument {
        None | Some("") => Ok(Bounds::UNBOUNDED),
        Some(range) => Bounds::parse(range),
    }
}
