// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Usage beacon: which phrase was searched and how many results it got.
//!
//! Sent once results have been on screen for the metrics delay. Anything that
//! changes what's on screen first cancels it, so a user typing "rust async"
//! reports one search, not nine.

use crate::api::SearchApi;
use crate::debounce::Debouncer;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

pub struct MetricsReporter {
    timer: Debouncer,
    runtime: Handle,
    api: Arc<dyn SearchApi>,
}

impl MetricsReporter {
    pub fn new(api: Arc<dyn SearchApi>, runtime: Handle, delay: Duration) -> Self {
        Self {
            timer: Debouncer::new(delay),
            runtime,
            api,
        }
    }

    /// Replace any pending beacon with one for `query`.
    pub fn schedule(&self, query: String, results_count: usize) {
        if query.trim().is_empty() {
            self.timer.cancel();
            return;
        }
        let api = self.api.clone();
        self.timer.schedule(&self.runtime, move |_| async move {
            // Fire and forget; failures only show up in logs
            if let Err(err) = api.send_metrics(&query, results_count).await {
                debug!(error = %err, "metrics beacon failed");
            }
        });
    }

    pub fn cancel(&self) {
        self.timer.cancel();
    }
}
