// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runs one query against whichever backend the session resolved.

use crate::api::SearchApi;
use crate::backend::{BackendHandle, BackendSelector};
use crate::debounce::QueryToken;
use crate::index::SearchOptions;
use crate::types::RawMatch;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct SearchExecutor {
    api: Arc<dyn SearchApi>,
    selector: Arc<BackendSelector>,
    options: SearchOptions,
}

impl SearchExecutor {
    pub fn new(api: Arc<dyn SearchApi>, selector: Arc<BackendSelector>, options: SearchOptions) -> Self {
        Self {
            api,
            selector,
            options,
        }
    }

    /// Execute `query`, waiting for bootstrap first if it hasn't settled.
    ///
    /// Returns `None` when `token` was cancelled before the results were
    /// ready. Backend failures are not errors here: they produce no matches.
    pub async fn execute(&self, query: &str, token: &QueryToken) -> Option<Vec<RawMatch>> {
        let backend = self.selector.resolved().await;
        if token.is_cancelled() {
            return None;
        }

        let matches = match &backend {
            BackendHandle::Local(index) => index.search_matches(query, &self.options),
            BackendHandle::Remote => self.remote(query).await,
        };

        if token.is_cancelled() {
            debug!(query = token.id(), "results discarded: superseded");
            return None;
        }
        debug!(
            query = token.id(),
            backend = %backend.mode(),
            matches = matches.len(),
            "query executed"
        );
        Some(matches)
    }

    async fn remote(&self, query: &str) -> Vec<RawMatch> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        match self.api.search(query).await {
            Ok(hits) => hits.into_iter().map(RawMatch::from).collect(),
            Err(err) => {
                warn!(error = %err, "remote search failed");
                Vec::new()
            }
        }
    }
}
