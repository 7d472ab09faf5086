// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Quiet-period timers and cancellation tokens.
//!
//! A [`Debouncer`] owns at most one live [`QueryToken`]. Issuing a new token
//! cancels the previous one, and a timer only runs its task if its token is
//! still live when the quiet period ends. Timers are never aborted: a
//! superseded timer wakes up, sees its token is dead, and exits.
//!
//! ```text
//! "r"   ──issue #1──▶ sleep ······ (cancelled by #2)
//! "ru"  ──issue #2──▶ sleep ······ (cancelled by #3)
//! "rus" ──issue #3──▶ sleep 240ms ──▶ execute ──▶ on_settle(#3)
//! ```
//!
//! Cancellation is cooperative. Work already in flight runs to completion;
//! its result is dropped by whoever checks the token afterwards.

use crate::executor::SearchExecutor;
use crate::types::RawMatch;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// Token ids are unique for the life of the process, so a stale id from a
/// previous session can never equal a live one.
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identity and liveness of one scheduled query.
#[derive(Debug, Clone)]
pub struct QueryToken {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl QueryToken {
    fn next() -> Self {
        Self {
            id: NEXT_TOKEN.fetch_add(1, Ordering::Relaxed),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        !self.is_cancelled()
    }
}

/// Generic trailing-edge debouncer.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    live: Mutex<Option<QueryToken>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            live: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel the live token, if any, and make a fresh one live.
    pub fn issue(&self) -> QueryToken {
        let token = QueryToken::next();
        if let Some(previous) = self.live.lock().replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    /// Cancel the live token without issuing another.
    pub fn cancel(&self) {
        if let Some(previous) = self.live.lock().take() {
            previous.cancel();
        }
    }

    pub fn live(&self) -> Option<QueryToken> {
        self.live.lock().clone()
    }

    /// Run `task` on `runtime` once the quiet period elapses, unless `token`
    /// was cancelled in the meantime.
    pub fn spawn<F, Fut>(&self, runtime: &Handle, token: QueryToken, task: F) -> JoinHandle<()>
    where
        F: FnOnce(QueryToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if token.is_cancelled() {
                return;
            }
            task(token).await;
        })
    }

    pub fn schedule<F, Fut>(&self, runtime: &Handle, task: F) -> QueryToken
    where
        F: FnOnce(QueryToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.issue();
        self.spawn(runtime, token.clone(), task);
        token
    }
}

/// Debounces phrase changes into executor runs.
pub struct QueryDebouncer {
    timer: Debouncer,
    runtime: Handle,
    executor: Arc<SearchExecutor>,
}

impl QueryDebouncer {
    pub fn new(runtime: Handle, delay: Duration, executor: Arc<SearchExecutor>) -> Self {
        Self {
            timer: Debouncer::new(delay),
            runtime,
            executor,
        }
    }

    /// Supersede whatever is pending and hand out the next query's token.
    ///
    /// Split from [`run`](Self::run) so the caller can record the token id
    /// before anything can settle under it.
    pub fn issue(&self) -> QueryToken {
        self.timer.issue()
    }

    /// After the quiet period, execute `phrase` and pass the matches to
    /// `on_settle`, provided `token` is still live at both ends.
    pub fn run<F>(&self, token: QueryToken, phrase: String, on_settle: F)
    where
        F: FnOnce(&QueryToken, Vec<RawMatch>) + Send + 'static,
    {
        let executor = self.executor.clone();
        self.timer.spawn(&self.runtime, token, move |token| async move {
            debug!(query = token.id(), phrase = %phrase, "quiet period elapsed");
            let Some(matches) = executor.execute(&phrase, &token).await else {
                return;
            };
            if token.is_live() {
                on_settle(&token, matches);
            }
        });
    }

    /// Issue and run in one step. An empty phrase only cancels.
    pub fn schedule<F>(&self, phrase: &str, on_settle: F) -> Option<QueryToken>
    where
        F: FnOnce(&QueryToken, Vec<RawMatch>) + Send + 'static,
    {
        if phrase.trim().is_empty() {
            self.cancel();
            return None;
        }
        let token = self.issue();
        self.run(token.clone(), phrase.to_string(), on_settle);
        Some(token)
    }

    pub fn cancel(&self) {
        self.timer.cancel();
    }
}
