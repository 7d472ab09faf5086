// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search session: one open/close cycle of the widget.
//!
//! ```text
//!            open()                 bootstrap settles
//!  Closed ──────────▶ Initializing ──────────────────▶ Ready{mode}
//!    ▲                                                  │     ▲
//!    │ close()                       on_phrase_change() │     │ results settle
//!    └──────────────────────── (any state) ◀───────  Searching{mode}
//! ```
//!
//! The controller owns the published [`SessionState`] and applies every
//! change through [`SessionState::apply`] inside `watch::Sender::send_if_modified`.
//! Checking a query's token id and committing its results therefore happen
//! under one lock; no interleaving lets a superseded query overwrite a newer
//! one.
//!
//! Everything a session spawns (bootstrap, recommendations, debounce timers,
//! metrics) is tied to that session. `close()` cancels it; anything that
//! finishes anyway is rejected by the reducer's epoch and token checks.

mod state;

pub use state::{
    RecommendationStatus, Recommendations, SessionAction, SessionPhase, SessionState,
};

use crate::api::{HttpApi, SearchApi};
use crate::backend::{BackendHandle, BackendSelector};
use crate::bootstrap::initialize;
use crate::config::{Config, SessionOptions};
use crate::debounce::QueryDebouncer;
use crate::executor::SearchExecutor;
use crate::format::ResultFormatter;
use crate::metrics::MetricsReporter;
use crate::types::{DisplayResult, RawMatch};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error, info, warn};

type SharedState = Arc<watch::Sender<SessionState>>;

/// Per-open resources. Dropped on close.
struct ActiveSession {
    epoch: u64,
    queries: QueryDebouncer,
    metrics: Arc<MetricsReporter>,
    selector: Arc<BackendSelector>,
    bootstrap: JoinHandle<()>,
    init_abort: AbortHandle,
    recommendations: JoinHandle<()>,
}

pub struct SessionController {
    config: Config,
    options: SessionOptions,
    api: Arc<dyn SearchApi>,
    runtime: Handle,
    formatter: ResultFormatter,
    state: SharedState,
    session: Mutex<Option<ActiveSession>>,
    epochs: AtomicU64,
}

impl SessionController {
    pub fn new(config: Config, api: Arc<dyn SearchApi>, runtime: Handle) -> Self {
        Self::with_options(config, api, runtime, SessionOptions::default())
    }

    pub fn with_options(
        config: Config,
        api: Arc<dyn SearchApi>,
        runtime: Handle,
        options: SessionOptions,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            formatter: ResultFormatter::new(options.excerpt_window),
            config,
            options,
            api,
            runtime,
            state: Arc::new(state),
            session: Mutex::new(None),
            epochs: AtomicU64::new(0),
        }
    }

    /// Controller talking to the real service described by `config`.
    pub fn http(config: Config, runtime: Handle) -> Self {
        let api: Arc<dyn SearchApi> = Arc::new(HttpApi::new(config.clone()));
        Self::new(config, api, runtime)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Start a session: bootstrap the backend and load recommendations.
    /// Opening an open session does nothing.
    pub fn open(&self) {
        let mut session = self.session.lock();
        if session.is_some() {
            return;
        }

        let epoch = self.epochs.fetch_add(1, Ordering::Relaxed) + 1;
        self.state
            .send_if_modified(|s| s.apply(SessionAction::Opened { epoch }));

        let selector = Arc::new(BackendSelector::new());
        let executor = Arc::new(SearchExecutor::new(
            self.api.clone(),
            selector.clone(),
            self.options.search.clone(),
        ));

        // Spawned separately so a panic inside bootstrap still settles the
        // selector and unblocks deferred queries
        let init = {
            let api = self.api.clone();
            self.runtime.spawn(async move { initialize(api.as_ref()).await })
        };
        let init_abort = init.abort_handle();
        let bootstrap = self.runtime.spawn(bootstrap(
            init,
            selector.clone(),
            self.state.clone(),
            epoch,
        ));
        let recommendations = self.runtime.spawn(load_recommendations(
            self.api.clone(),
            self.state.clone(),
            epoch,
        ));

        *session = Some(ActiveSession {
            epoch,
            queries: QueryDebouncer::new(self.runtime.clone(), self.options.debounce, executor),
            metrics: Arc::new(MetricsReporter::new(
                self.api.clone(),
                self.runtime.clone(),
                self.options.metrics_delay,
            )),
            selector,
            bootstrap,
            init_abort,
            recommendations,
        });
        info!(epoch, "search session opened");
    }

    /// Feed the current input text. Ignored while closed.
    pub fn on_phrase_change(&self, text: &str) {
        let session = self.session.lock();
        let Some(active) = session.as_ref() else {
            debug!("phrase change ignored: session closed");
            return;
        };
        if self.state.borrow().phrase == text {
            return;
        }

        if text.trim().is_empty() {
            active.queries.cancel();
            self.state.send_if_modified(|s| {
                s.apply(SessionAction::PhraseChanged {
                    phrase: text.to_string(),
                    query: None,
                })
            });
            active.metrics.cancel();
            return;
        }

        let token = active.queries.issue();
        self.state.send_if_modified(|s| {
            s.apply(SessionAction::PhraseChanged {
                phrase: text.to_string(),
                query: Some(token.id()),
            })
        });
        // After the state change: a settle racing with us either committed
        // before it (and its beacon is cancelled here) or is now rejected.
        active.metrics.cancel();

        let state = self.state.clone();
        let formatter = self.formatter;
        let metrics = active.metrics.clone();
        active
            .queries
            .run(token, text.to_string(), move |token, matches| {
                commit_results(&state, &metrics, formatter, token.id(), matches);
            });
    }

    /// End the session. Pending queries, metrics and bootstrap are cancelled
    /// and the published state goes back to its closed default.
    pub fn close(&self) {
        let Some(active) = self.session.lock().take() else {
            return;
        };
        active.queries.cancel();
        active.bootstrap.abort();
        active.init_abort.abort();
        active.recommendations.abort();
        // Queries parked on an unresolved backend wake, see their cancelled
        // token and exit
        active.selector.fail();
        self.state.send_if_modified(|s| s.apply(SessionAction::Closed));
        active.metrics.cancel();
        info!(epoch = active.epoch, "search session closed");
    }

    pub fn is_open(&self) -> bool {
        self.session.lock().is_some()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Wait until the session is bootstrapped with no query pending.
    ///
    /// Returns the closed default if the session is (or becomes) closed.
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        let outcome = rx
            .wait_for(|s| !s.open || s.is_settled())
            .await
            .map(|s| s.clone());
        outcome.unwrap_or_default()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.close();
    }
}

fn commit_results(
    state: &SharedState,
    metrics: &MetricsReporter,
    formatter: ResultFormatter,
    query: u64,
    matches: Vec<RawMatch>,
) {
    let results = formatter.format_all(matches);
    state.send_if_modified(|s| {
        let committed = s.apply(SessionAction::ResultsSettled { query, results });
        if committed {
            debug!(query, results = s.results.len(), "results committed");
            metrics.schedule(s.phrase.clone(), s.results.len());
        } else {
            debug!(query, "results discarded: stale");
        }
        committed
    });
}

async fn bootstrap(
    init: JoinHandle<BackendHandle>,
    selector: Arc<BackendSelector>,
    state: SharedState,
    epoch: u64,
) {
    match init.await {
        Ok(handle) => selector.resolve(handle),
        Err(err) if err.is_cancelled() => {
            debug!(epoch, "bootstrap cancelled");
            return;
        }
        Err(err) => {
            error!(error = %err, "bootstrap task failed; using remote search");
            selector.fail()
        }
    };

    let mode = selector.mode();
    let status = selector.status();
    state.send_if_modified(|s| {
        s.apply(SessionAction::BackendResolved {
            epoch,
            mode,
            status,
        })
    });
}

async fn load_recommendations(api: Arc<dyn SearchApi>, state: SharedState, epoch: u64) {
    match api.recommendations().await {
        Ok(hits) => {
            let results: Vec<DisplayResult> = hits.into_iter().map(DisplayResult::from).collect();
            state.send_if_modified(|s| {
                s.apply(SessionAction::RecommendationsLoaded { epoch, results })
            });
        }
        Err(err) => {
            warn!(error = %err, "recommendations unavailable");
            state.send_if_modified(|s| s.apply(SessionAction::RecommendationsFailed { epoch }));
        }
    }
}
