// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! [`FakeApi`] is a scripted [`SearchApi`]: it answers from canned data,
//! sleeps on tokio's clock where told to (so paused-time tests can reorder
//! responses), and records every call.

#![doc(hidden)]

use crate::api::{ApiFuture, LicenseMode, SearchApi};
use crate::error::SearchError;
use crate::index::{BundleDocument, IndexBundle, BUNDLE_VERSION};
use crate::types::RemoteHit;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

/// One recorded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Config,
    IndexBundle,
    Search(String),
    Recommendations,
    Metrics { query: String, results_count: usize },
}

#[derive(Debug, Clone)]
struct Script {
    /// `None` simulates an unreachable service.
    mode: Option<LicenseMode>,
    /// `None` simulates a 404 for the bundle.
    bundle: Option<String>,
    bootstrap_delay: Duration,
    hits: HashMap<String, Vec<RemoteHit>>,
    delays: HashMap<String, Duration>,
    search_fails: bool,
    recommendations: Option<Vec<RemoteHit>>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            mode: Some(LicenseMode::Server),
            bundle: None,
            bootstrap_delay: Duration::ZERO,
            hits: HashMap::new(),
            delays: HashMap::new(),
            search_fails: false,
            recommendations: Some(Vec::new()),
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeApi {
    script: Mutex<Script>,
    calls: Mutex<Vec<ApiCall>>,
}

fn transport(what: &str) -> SearchError {
    SearchError::Transport {
        url: format!("fake://{}", what),
        message: "connection refused".to_string(),
    }
}

impl FakeApi {
    /// A key licensed for server-side search.
    pub fn server() -> Self {
        Self::default()
    }

    /// A key licensed for client-side search, serving `bundle` as its index.
    pub fn client(bundle: impl Into<String>) -> Self {
        let api = Self::default();
        {
            let mut script = api.script.lock();
            script.mode = Some(LicenseMode::Client);
            script.bundle = Some(bundle.into());
        }
        api
    }

    /// Every request fails at the transport level.
    pub fn offline() -> Self {
        let api = Self::default();
        {
            let mut script = api.script.lock();
            script.mode = None;
            script.search_fails = true;
            script.recommendations = None;
        }
        api
    }

    pub fn with_mode(self, mode: LicenseMode) -> Self {
        self.script.lock().mode = Some(mode);
        self
    }

    pub fn without_bundle(self) -> Self {
        self.script.lock().bundle = None;
        self
    }

    pub fn with_bootstrap_delay(self, delay: Duration) -> Self {
        self.script.lock().bootstrap_delay = delay;
        self
    }

    pub fn with_hits(self, query: &str, hits: Vec<RemoteHit>) -> Self {
        self.script.lock().hits.insert(query.to_string(), hits);
        self
    }

    /// Delay the response to `query` by `delay` of tokio time.
    pub fn with_delay(self, query: &str, delay: Duration) -> Self {
        self.script.lock().delays.insert(query.to_string(), delay);
        self
    }

    pub fn failing_search(self) -> Self {
        self.script.lock().search_fails = true;
        self
    }

    pub fn with_recommendations(self, hits: Vec<RemoteHit>) -> Self {
        self.script.lock().recommendations = Some(hits);
        self
    }

    pub fn failing_recommendations(self) -> Self {
        self.script.lock().recommendations = None;
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().clone()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                ApiCall::Search(q) => Some(q.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn metrics_calls(&self) -> Vec<(String, usize)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                ApiCall::Metrics {
                    query,
                    results_count,
                } => Some((query.clone(), *results_count)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) -> Script {
        self.calls.lock().push(call);
        self.script.lock().clone()
    }
}

impl SearchApi for FakeApi {
    fn license_mode(&self) -> ApiFuture<'_, LicenseMode> {
        Box::pin(async move {
            let script = self.record(ApiCall::Config);
            if !script.bootstrap_delay.is_zero() {
                tokio::time::sleep(script.bootstrap_delay).await;
            }
            script.mode.ok_or_else(|| transport("v1/config"))
        })
    }

    fn index_bundle(&self) -> ApiFuture<'_, String> {
        Box::pin(async move {
            let script = self.record(ApiCall::IndexBundle);
            script.bundle.ok_or_else(|| SearchError::Status {
                url: "fake://v1/index".to_string(),
                status: 404,
            })
        })
    }

    fn search<'a>(&'a self, query: &'a str) -> ApiFuture<'a, Vec<RemoteHit>> {
        Box::pin(async move {
            let script = self.record(ApiCall::Search(query.to_string()));
            if let Some(delay) = script.delays.get(query) {
                tokio::time::sleep(*delay).await;
            }
            if script.search_fails {
                return Err(transport("v1/search"));
            }
            Ok(script.hits.get(query).cloned().unwrap_or_default())
        })
    }

    fn recommendations(&self) -> ApiFuture<'_, Vec<RemoteHit>> {
        Box::pin(async move {
            let script = self.record(ApiCall::Recommendations);
            script
                .recommendations
                .ok_or_else(|| transport("v1/recommendations"))
        })
    }

    fn send_metrics<'a>(&'a self, query: &'a str, results_count: usize) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            self.record(ApiCall::Metrics {
                query: query.to_string(),
                results_count,
            });
            Ok(())
        })
    }
}

/// A remote hit with a body derived from its uri.
pub fn hit(uri: &str, title: &str) -> RemoteHit {
    RemoteHit {
        title: title.to_string(),
        excerpt: format!("excerpt for {}", uri),
        uri: uri.to_string(),
        category: "docs".to_string(),
        thumbnail: None,
    }
}

/// A bundle document in the default category with no tags.
pub fn make_doc(uri: &str, title: &str, text: &str) -> BundleDocument {
    BundleDocument {
        id: None,
        uri: uri.to_string(),
        title: title.to_string(),
        text: text.to_string(),
        category: "blog".to_string(),
        tags: vec![],
        thumbnail: None,
    }
}

pub fn make_bundle(documents: Vec<BundleDocument>) -> IndexBundle {
    IndexBundle {
        version: BUNDLE_VERSION,
        documents,
    }
}

/// Serialized bundle, as the service would return it.
pub fn bundle_json(documents: Vec<BundleDocument>) -> String {
    serde_json::to_string(&make_bundle(documents)).unwrap_or_default()
}

/// A small corpus with overlapping vocabulary.
pub fn sample_documents() -> Vec<BundleDocument> {
    vec![
        make_doc("/", "Home", "Welcome to the site about cats and search"),
        make_doc(
            "/blog/cats",
            "All about cats",
            "The cat sat on the mat while the category page loaded",
        ),
        make_doc(
            "/docs/search",
            "Search guide",
            "Searching the documentation with prefix and fuzzy matching",
        ),
        make_doc(
            "/docs/rust",
            "Rust notes",
            "Rustic ownership rules and the borrow checker explained",
        ),
    ]
}
