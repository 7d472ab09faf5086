// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turning raw matches into display results.
//!
//! Two pieces: term highlighting and excerpt extraction. Both are pure
//! functions over their inputs, so the formatter holds nothing but its
//! window size.
//!
//! # Highlighting
//!
//! All terms go into one alternation, longest first:
//!
//! ```text
//! terms ["cat", "category"] ──▶ (?i)\b(?:category|cat)\b
//! ```
//!
//! The regex engine tries alternatives left to right, so with the longer
//! term first "category" is wrapped whole instead of leaving a `cat` span
//! inside it. Terms are escaped, so metacharacters never act as regex syntax,
//! but the `\b` anchors still apply: a term that begins or ends with
//! punctuation, like "c++", has no word boundary to anchor on and is never
//! highlighted.
//!
//! # Excerpts
//!
//! The window is the [`EXCERPT_WINDOW`] tokens *following* the first
//! occurrence of the top matched term. Matches late in a long document still
//! get a full window.

use crate::config::EXCERPT_WINDOW;
use crate::types::{DisplayResult, MatchSource, RawMatch};
use regex::{Regex, RegexBuilder};

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";
pub const ELLIPSIS: &str = "...";

/// Build the case-insensitive, word-bounded alternation for `terms`.
///
/// Returns `None` when there is nothing to highlight.
pub fn highlight_pattern<S: AsRef<str>>(terms: &[S]) -> Option<Regex> {
    let mut terms: Vec<&str> = terms
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| !t.trim().is_empty())
        .collect();
    if terms.is_empty() {
        return None;
    }

    terms.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    terms.dedup();

    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    // Escaped literals always compile; a failure here means the pattern blew
    // the size limit, in which case plain text is the right answer.
    RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Wrap every whole-word occurrence of any term in `<mark>` spans.
pub fn highlight<S: AsRef<str>>(text: &str, terms: &[S]) -> String {
    match highlight_pattern(terms) {
        Some(pattern) => highlight_with(&pattern, text),
        None => text.to_string(),
    }
}

fn highlight_with(pattern: &Regex, text: &str) -> String {
    pattern
        .replace_all(text, |caps: &regex::Captures<'_>| {
            format!("{}{}{}", MARK_OPEN, &caps[0], MARK_CLOSE)
        })
        .into_owned()
}

/// Pick the token window for an excerpt, before highlighting.
///
/// Starts at the first token exactly equal to `terms[0]`; falls back to the
/// start of the text when there are no terms or the top term never appears
/// verbatim.
pub fn excerpt_window<'a, S: AsRef<str>>(text: &'a str, terms: &[S], window: usize) -> Vec<&'a str> {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    let start = terms
        .first()
        .and_then(|first| tokens.iter().position(|t| *t == first.as_ref()))
        .unwrap_or(0);

    let end = start.saturating_add(window).min(tokens.len());
    tokens[start..end].to_vec()
}

/// Excerpt text: windowed, highlighted, with a trailing ellipsis.
pub fn excerpt<S: AsRef<str>>(text: &str, terms: &[S], window: usize) -> String {
    let joined = excerpt_window(text, terms, window).join(" ");
    let mut out = highlight(&joined, terms);
    out.push_str(ELLIPSIS);
    out
}

/// Converts raw matches into display results.
#[derive(Debug, Clone, Copy)]
pub struct ResultFormatter {
    window: usize,
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(EXCERPT_WINDOW)
    }
}

impl ResultFormatter {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn format(&self, raw: RawMatch) -> DisplayResult {
        match raw.source {
            MatchSource::Remote => DisplayResult {
                uri: raw.uri,
                title: raw.title,
                excerpt: raw.text,
                category: raw.category,
                thumbnail: raw.thumbnail,
            },
            MatchSource::Index => {
                let pattern = highlight_pattern(&raw.matched_terms);
                let words = excerpt_window(&raw.text, &raw.matched_terms, self.window).join(" ");

                let (title, mut body) = match &pattern {
                    Some(p) => (highlight_with(p, &raw.title), highlight_with(p, &words)),
                    None => (raw.title.clone(), words),
                };
                body.push_str(ELLIPSIS);

                DisplayResult {
                    uri: raw.uri,
                    title,
                    excerpt: body,
                    category: raw.category,
                    thumbnail: raw.thumbnail,
                }
            }
        }
    }

    pub fn format_all(&self, matches: Vec<RawMatch>) -> Vec<DisplayResult> {
        matches.into_iter().map(|m| self.format(m)).collect()
    }
}
