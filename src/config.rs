// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Widget configuration.
//!
//! A `Config` is supplied once per widget instantiation and never changes
//! while a session is open. `SessionOptions` holds the timing and matching
//! knobs; the defaults are what the hosted widget ships with.

use crate::error::{Result, SearchError};
use crate::index::SearchOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.easysitesearch.com";
pub const DEFAULT_PLACEHOLDER: &str = "Search anything";

/// Quiet period before a typed phrase turns into a query.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(240);

/// Quiet period after results settle before the usage beacon goes out.
pub const METRICS_DELAY: Duration = Duration::from_millis(1000);

/// Excerpt length in whitespace-separated tokens.
pub const EXCERPT_WINDOW: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(alias = "key")]
    pub access_key: String,
    #[serde(alias = "apiUrl", default = "default_api_base_url")]
    pub api_base_url: String,
    /// Prefix for result links. Empty means links are site-relative.
    #[serde(default)]
    pub result_base_url: String,
    #[serde(default = "default_placeholder")]
    pub search_placeholder: String,
    /// Override for the local index bundle location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_url: Option<String>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

impl Config {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            api_base_url: default_api_base_url(),
            result_base_url: String::new(),
            search_placeholder: default_placeholder(),
            index_url: None,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(raw).map_err(|e| SearchError::malformed("config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SearchError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    /// Reject configs no request could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.access_key.trim().is_empty() {
            return Err(SearchError::Config("access key is empty".to_string()));
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(SearchError::Config(format!(
                "api base url '{}' is not http(s)",
                self.api_base_url
            )));
        }
        Ok(())
    }

    /// `https://host/` and `https://host` address the same endpoints.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url.trim_end_matches('/'), path)
    }

    /// Where the local index bundle for this key lives.
    pub fn index_bundle_url(&self) -> String {
        match &self.index_url {
            Some(url) => url.clone(),
            None => self.endpoint(&format!("/v1/index/{}.json", self.access_key)),
        }
    }
}

/// Timing and matching knobs for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub debounce: Duration,
    pub metrics_delay: Duration,
    pub excerpt_window: usize,
    pub search: SearchOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE_DELAY,
            metrics_delay: METRICS_DELAY,
            excerpt_window: EXCERPT_WINDOW,
            search: SearchOptions::default(),
        }
    }
}
