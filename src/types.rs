// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The values that flow through a search session.
//!
//! ```text
//! backend hit ──▶ RawMatch ──format──▶ DisplayResult ──▶ SessionState.results
//! ```
//!
//! `RawMatch` is backend-agnostic: the local index and the remote API both
//! produce it. `DisplayResult` is what the rendering layer consumes and is
//! never mutated after the formatter builds it.

use crate::config::Config;
use serde::{Deserialize, Serialize};

/// Where a match came from, which decides how much formatting it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
    /// Local index hit: raw document text, needs highlighting and an excerpt.
    Index,
    /// Remote API hit: title and text are already highlighted by the server.
    Remote,
}

/// One document hit, before formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatch {
    pub uri: String,
    pub title: String,
    /// Full document body for index hits, the server excerpt for remote hits.
    pub text: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Document terms that matched, most relevant first. May be empty.
    #[serde(default)]
    pub matched_terms: Vec<String>,
    pub source: MatchSource,
}

/// Wire shape of `/v1/search` and `/v1/recommendations` items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteHit {
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    pub uri: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl From<RemoteHit> for RawMatch {
    fn from(hit: RemoteHit) -> Self {
        RawMatch {
            uri: hit.uri,
            title: hit.title,
            text: hit.excerpt,
            category: hit.category,
            thumbnail: hit.thumbnail,
            matched_terms: Vec::new(),
            source: MatchSource::Remote,
        }
    }
}

/// A display-ready result. `title` and `excerpt` carry `<mark>` spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayResult {
    pub uri: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl DisplayResult {
    /// Link target: the configured base url joined with the result uri.
    pub fn href(&self, config: &Config) -> String {
        format!("{}{}", config.result_base_url, self.uri)
    }

    /// Results on another origin open in a new tab.
    pub fn opens_in_new_tab(&self, config: &Config) -> bool {
        !config.result_base_url.is_empty()
    }

    /// Human label for the uri line under the title.
    pub fn display_uri(&self) -> &str {
        if self.uri == "/" {
            "homepage"
        } else {
            &self.uri
        }
    }
}

impl From<RemoteHit> for DisplayResult {
    fn from(hit: RemoteHit) -> Self {
        DisplayResult {
            uri: hit.uri,
            title: hit.title,
            excerpt: hit.excerpt,
            category: hit.category,
            thumbnail: hit.thumbnail,
        }
    }
}
