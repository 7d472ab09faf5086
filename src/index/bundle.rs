// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The serialized index bundle served for client-mode keys.
//!
//! ```json
//! {
//!   "version": 1,
//!   "documents": [
//!     { "uri": "/blog/a", "title": "A", "text": "...", "category": "blog",
//!       "tags": ["rust"], "thumbnail": "/img/a.png" }
//!   ]
//! }
//! ```
//!
//! The bundle carries documents, not a prebuilt index. Building the term
//! postings on load keeps the wire format stable across scoring changes.

use crate::error::{BundleError, Result, SearchError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const BUNDLE_VERSION: u32 = 1;

fn default_version() -> u32 {
    BUNDLE_VERSION
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexBundle {
    #[serde(default = "default_version")]
    pub version: u32,
    pub documents: Vec<BundleDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub uri: String,
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl IndexBundle {
    /// Parse and validate in one step. Both failure kinds are "local mode
    /// unavailable" to the bootstrapper, but they log differently.
    pub fn from_json(raw: &str) -> Result<Self> {
        let bundle: IndexBundle =
            serde_json::from_str(raw).map_err(|e| SearchError::malformed("index bundle", e))?;
        bundle.validate()?;
        Ok(bundle)
    }

    pub fn validate(&self) -> std::result::Result<(), BundleError> {
        if self.version != BUNDLE_VERSION {
            return Err(BundleError::UnsupportedVersion {
                found: self.version,
                supported: BUNDLE_VERSION,
            });
        }

        let mut seen = HashSet::with_capacity(self.documents.len());
        for (position, doc) in self.documents.iter().enumerate() {
            if doc.uri.trim().is_empty() {
                return Err(BundleError::MissingUri { position });
            }
            if !seen.insert(doc.uri.as_str()) {
                return Err(BundleError::DuplicateUri {
                    uri: doc.uri.clone(),
                });
            }
        }
        Ok(())
    }
}
