//! Text reading and cleanup rules for extracted fields
//!
//! The text conventions follow what a scraper sees in a rendered page:
//! "stripped" text trims every descendant text node and concatenates the
//! non-empty pieces, "raw" text concatenates the nodes untouched.

use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Node, Selector};
use std::collections::HashSet;

/// Cleanup applied to the string read from an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Value as read
    Passthrough,
    /// Drop the first and last character, e.g. `"(123)"` → `"123"`
    Unwrap,
    /// Substring before the first occurrence of the token, trimmed
    BeforeToken(&'static str),
    /// Remove every occurrence of the token, then trim
    RemoveToken(&'static str),
}

impl Transform {
    #[must_use]
    pub fn apply(&self, value: &str) -> String {
        match self {
            Transform::Passthrough => value.to_string(),
            Transform::Unwrap => unwrap_delimited(value),
            Transform::BeforeToken(token) => before_token(value, token),
            Transform::RemoveToken(token) => value.replace(token, "").trim().to_string(),
        }
    }
}

/// Strip the first and last character
///
/// Strings shorter than two characters become empty.
#[must_use]
pub fn unwrap_delimited(value: &str) -> String {
    let mut chars = value.chars();
    if chars.next().is_none() || chars.next_back().is_none() {
        return String::new();
    }
    chars.as_str().to_string()
}

/// Trimmed substring before `token`; the whole trimmed value if it is absent
#[must_use]
pub fn before_token(value: &str, token: &str) -> String {
    match value.find(token) {
        Some(idx) => value[..idx].trim().to_string(),
        None => value.trim().to_string(),
    }
}

/// Numeric parse with a zero default; thousands separators are ignored
#[must_use]
pub fn parse_count(value: Option<&str>) -> u32 {
    value
        .map(|v| v.trim().replace(',', ""))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Numeric parse with a zero default
#[must_use]
pub fn parse_rating(value: Option<&str>) -> f32 {
    value
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Trimmed text nodes of `element`, concatenated
#[must_use]
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Text nodes of `element`, concatenated untouched
#[must_use]
pub fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Stripped text of `element` with every descendant matching `noise` removed
///
/// Price nodes carry nested labels (e.g. "was" or per-unit markers) that
/// are not part of the value; those are dropped before the text is read.
#[must_use]
pub fn text_without(element: ElementRef<'_>, noise: &Selector) -> String {
    let noise_ids: HashSet<NodeId> = element.select(noise).map(node_id).collect();
    if noise_ids.is_empty() {
        return stripped_text(element);
    }

    let root: NodeRef<'_, Node> = *element;
    let root_id = root.id();
    let mut out = String::new();

    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let in_noise = node
            .ancestors()
            .take_while(|a| a.id() != root_id)
            .any(|a| noise_ids.contains(&a.id()));
        if in_noise {
            continue;
        }

        let piece = text.trim();
        if !piece.is_empty() {
            out.push_str(piece);
        }
    }

    out
}

fn node_id(element: ElementRef<'_>) -> NodeId {
    let node: NodeRef<'_, Node> = *element;
    node.id()
}
