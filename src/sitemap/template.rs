//! Redirect target templates.
//!
//! `/archive/:0:/:1:/` is parsed once at load time into literal text and
//! indexed slots. Slot `N` is filled with the `N`th captured dynamic value.
//! A colon that does not open a `:digits:` slot is plain text, so absolute
//! targets such as `https://example.com/` need no escaping.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("redirect target is empty")]
    Empty,

    #[error("placeholder :{slot}: refers past the {captures} dynamic node(s) of the rule")]
    SlotOutOfRange { slot: usize, captures: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Slot(usize),
}

/// Parsed redirect target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTemplate {
    parts: Vec<Part>,
    has_query: bool,
}

impl RedirectTemplate {
    /// Parse `source`, rejecting slots that `captures` dynamic nodes cannot fill.
    pub fn parse(source: &str, captures: usize) -> Result<Self, TemplateError> {
        if source.is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut parts = Vec::new();
        let mut text = String::new();
        let mut rest = source;

        while let Some(start) = rest.find(':') {
            let after = &rest[start + 1..];
            let digits = after.bytes().take_while(u8::is_ascii_digit).count();
            let closed = digits > 0 && after.as_bytes().get(digits) == Some(&b':');

            if !closed {
                text.push_str(&rest[..=start]);
                rest = after;
                continue;
            }

            // Up to 20 digits may still overflow usize; such a slot is out of range anyway.
            let slot = after[..digits].parse::<usize>().unwrap_or(usize::MAX);
            if slot >= captures {
                return Err(TemplateError::SlotOutOfRange { slot, captures });
            }

            text.push_str(&rest[..start]);
            if !text.is_empty() {
                parts.push(Part::Text(std::mem::take(&mut text)));
            }
            parts.push(Part::Slot(slot));
            rest = &after[digits + 1..];
        }

        text.push_str(rest);
        if !text.is_empty() {
            parts.push(Part::Text(text));
        }

        Ok(Self {
            parts,
            has_query: source.contains('?'),
        })
    }

    /// True if the target already carries a query component.
    pub fn has_query(&self) -> bool {
        self.has_query
    }

    /// Fill every slot from `captures`.
    pub fn render(&self, captures: &[String]) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Slot(slot) => {
                    if let Some(value) = captures.get(*slot) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }
}
