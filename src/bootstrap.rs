// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Session bootstrap: decide between the local index and remote search.
//!
//! ```text
//! GET /v1/config ──▶ mode == client? ──yes──▶ GET bundle ──▶ build ──▶ Local
//!        │                  │no                  │ error
//!        └── error ─────────┴────────────────────┴────────────────▶ Remote
//! ```
//!
//! Never fails: every error degrades to remote search.

use crate::api::{LicenseMode, SearchApi};
use crate::backend::BackendHandle;
use crate::error::Result;
use crate::index::LocalIndex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolve the backend for one session.
pub async fn initialize(api: &dyn SearchApi) -> BackendHandle {
    match load_local(api).await {
        Ok(Some(index)) => {
            let stats = index.stats();
            info!(
                documents = stats.documents,
                terms = stats.terms,
                "local index ready"
            );
            BackendHandle::Local(Arc::new(index))
        }
        Ok(None) => {
            debug!("key is not client-licensed; using remote search");
            BackendHandle::Remote
        }
        Err(err) => {
            warn!(error = %err, "local index unavailable; falling back to remote search");
            BackendHandle::Remote
        }
    }
}

async fn load_local(api: &dyn SearchApi) -> Result<Option<LocalIndex>> {
    let mode = api.license_mode().await?;
    if mode != LicenseMode::Client {
        debug!(?mode, "license mode");
        return Ok(None);
    }

    let raw = api.index_bundle().await?;
    LocalIndex::from_json(&raw).map(Some)
}
