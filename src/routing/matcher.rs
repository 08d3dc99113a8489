//! Route matching logic.
//!
//! # Responsibilities
//! - Scan rules in declaration order
//! - Return the first rule whose every node matches its segment
//! - Collect the dynamic values of that rule
//!
//! # Design Decisions
//! - First match wins; there is no scoring. Specific rules must be declared first
//! - Rules with a different node count are skipped before any node is tested
//! - The rule list is only read, never narrowed in place

use crate::sitemap::RouteRule;

/// A rule that matched, with its captured values.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub rule: &'a RouteRule,
    /// Dense, 0-based, in left-to-right order of the dynamic nodes.
    pub dynamic_url: Vec<String>,
}

/// Find the first rule matching `segments`.
pub fn find_match<'a>(rules: &'a [RouteRule], segments: &[String]) -> Option<RouteMatch<'a>> {
    let folded: Vec<String> = segments.iter().map(|s| s.to_lowercase()).collect();

    rules.iter().find_map(|rule| {
        rule.capture(segments, &folded)
            .map(|dynamic_url| RouteMatch { rule, dynamic_url })
    })
}
