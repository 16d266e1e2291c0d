//! Compound selectors.
//!
//! Supports the subset views use: a tag, `#id`, any number of `.class`
//! parts and `[attr=value]` / `[attr]` parts, all applying to one element.
//! Descendant combinators are resolved by [`Node::query_all`](super::Node::query_all).

use std::collections::BTreeMap;

/// A parsed compound selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Selector {
    /// Parse a selector such as `button.card__button[type=submit]`.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut selector = Self::default();
        let mut rest = input.trim();

        let tag_end = rest.find(['.', '#', '[']).unwrap_or(rest.len());
        let (tag, tail) = rest.split_at(tag_end);
        if !tag.is_empty() {
            selector.tag = Some(tag.to_string());
        }
        rest = tail;

        while let Some(marker) = rest.chars().next() {
            rest = &rest[marker.len_utf8()..];
            match marker {
                '[' => {
                    let end = rest.find(']').unwrap_or(rest.len());
                    let (inner, tail) = rest.split_at(end);
                    rest = tail.strip_prefix(']').unwrap_or(tail);
                    let (name, value) = match inner.split_once('=') {
                        Some((name, value)) => (
                            name.trim(),
                            Some(value.trim().trim_matches(['"', '\'']).to_string()),
                        ),
                        None => (inner.trim(), None),
                    };
                    selector.attrs.push((name.to_string(), value));
                }
                '.' | '#' => {
                    let end = rest.find(['.', '#', '[']).unwrap_or(rest.len());
                    let (name, tail) = rest.split_at(end);
                    rest = tail;
                    if marker == '.' {
                        selector.classes.push(name.to_string());
                    } else {
                        selector.id = Some(name.to_string());
                    }
                }
                _ => {}
            }
        }
        selector
    }

    pub(super) fn matches(
        &self,
        tag: &str,
        id: Option<&str>,
        classes: &[String],
        attrs: &BTreeMap<String, String>,
    ) -> bool {
        if self.tag.as_deref().is_some_and(|t| t != tag) {
            return false;
        }
        if self.id.is_some() && self.id.as_deref() != id {
            return false;
        }
        if !self.classes.iter().all(|c| classes.contains(c)) {
            return false;
        }
        self.attrs.iter().all(|(name, expected)| match expected {
            Some(expected) => attrs.get(name) == Some(expected),
            None => attrs.contains_key(name),
        })
    }
}
