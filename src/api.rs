// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The remote search service.
//!
//! | Endpoint              | Params                     | Response                 |
//! |-----------------------|----------------------------|--------------------------|
//! | `/v1/config`          | key                        | `{ "mode": "client" }`   |
//! | `/v1/search`          | key, query                 | `[RemoteHit]`            |
//! | `/v1/recommendations` | key                        | `[RemoteHit]`            |
//! | `/v1/metrics`         | key, query, results_count  | ignored                  |
//! | index bundle          | key                        | [`IndexBundle`] JSON     |
//!
//! [`SearchApi`] is the seam between the session pipeline and the network.
//! [`HttpApi`] is the production implementation: ureq is blocking, so each
//! request runs on tokio's blocking pool and the session only ever awaits.
//!
//! [`IndexBundle`]: crate::index::IndexBundle

use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::types::RemoteHit;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io::Read;
use std::pin::Pin;
use std::time::Duration;

pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// What the service says this key is licensed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseMode {
    /// Search runs in the widget against a downloaded index.
    Client,
    /// Search runs on the service.
    Server,
    /// A mode this build doesn't know. Treated like `Server`.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct ModeResponse {
    mode: LicenseMode,
}

/// Everything the session needs from the network.
pub trait SearchApi: Send + Sync + 'static {
    fn license_mode(&self) -> ApiFuture<'_, LicenseMode>;

    /// Raw JSON of the index bundle; parsing is the bootstrapper's job.
    fn index_bundle(&self) -> ApiFuture<'_, String>;

    fn search<'a>(&'a self, query: &'a str) -> ApiFuture<'a, Vec<RemoteHit>>;

    fn recommendations(&self) -> ApiFuture<'_, Vec<RemoteHit>>;

    fn send_metrics<'a>(&'a self, query: &'a str, results_count: usize) -> ApiFuture<'a, ()>;
}

/// HTTP implementation over ureq.
#[derive(Clone)]
pub struct HttpApi {
    config: Config,
    agent: ureq::Agent,
}

impl HttpApi {
    pub fn new(config: Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("sitesearch/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { config, agent }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    async fn get_text(&self, url: String, mut params: Vec<(&'static str, String)>) -> Result<String> {
        params.insert(0, ("key", self.config.access_key.clone()));
        let agent = self.agent.clone();
        let url_for_err = url.clone();

        tokio::task::spawn_blocking(move || fetch_text(&agent, &url, &params))
            .await
            .map_err(|e| SearchError::Transport {
                url: url_for_err,
                message: e.to_string(),
            })?
    }

    async fn get_hits(&self, path: &str, params: Vec<(&'static str, String)>) -> Result<Vec<RemoteHit>> {
        let body = self.get_text(self.config.endpoint(path), params).await?;
        serde_json::from_str(&body).map_err(|e| SearchError::malformed("result list", e))
    }
}

fn fetch_text(agent: &ureq::Agent, url: &str, params: &[(&str, String)]) -> Result<String> {
    let mut request = agent.get(url);
    for (name, value) in params {
        request = request.query(name, value);
    }

    match request.call() {
        Ok(response) => {
            // into_string() caps bodies at 10 MB; index bundles can be larger
            let mut body = String::new();
            response
                .into_reader()
                .read_to_string(&mut body)
                .map_err(|e| SearchError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(body)
        }
        Err(ureq::Error::Status(status, _)) => Err(SearchError::Status {
            url: url.to_string(),
            status,
        }),
        Err(ureq::Error::Transport(transport)) => Err(SearchError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        }),
    }
}

impl SearchApi for HttpApi {
    fn license_mode(&self) -> ApiFuture<'_, LicenseMode> {
        Box::pin(async move {
            let body = self
                .get_text(self.config.endpoint("/v1/config"), Vec::new())
                .await?;
            let response: ModeResponse = serde_json::from_str(&body)
                .map_err(|e| SearchError::malformed("config response", e))?;
            Ok(response.mode)
        })
    }

    fn index_bundle(&self) -> ApiFuture<'_, String> {
        Box::pin(async move {
            self.get_text(self.config.index_bundle_url(), Vec::new())
                .await
        })
    }

    fn search<'a>(&'a self, query: &'a str) -> ApiFuture<'a, Vec<RemoteHit>> {
        Box::pin(async move {
            self.get_hits("/v1/search", vec![("query", query.to_string())])
                .await
        })
    }

    fn recommendations(&self) -> ApiFuture<'_, Vec<RemoteHit>> {
        Box::pin(async move { self.get_hits("/v1/recommendations", Vec::new()).await })
    }

    fn send_metrics<'a>(&'a self, query: &'a str, results_count: usize) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            self.get_text(
                self.config.endpoint("/v1/metrics"),
                vec![
                    ("query", query.to_string()),
                    ("results_count", results_count.to_string()),
                ],
            )
            .await
            .map(|_| ())
        })
    }
}
