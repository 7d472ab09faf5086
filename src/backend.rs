// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Which backend serves this session's queries.
//!
//! The bootstrapper settles the choice once per session. Until then every
//! query waits in [`BackendSelector::resolved`]; afterwards the choice never
//! changes, so there's no per-query re-evaluation.

use crate::index::LocalIndex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Outcome of bootstrapping: a local index, or "use the remote API".
#[derive(Clone)]
pub enum BackendHandle {
    Local(Arc<LocalIndex>),
    Remote,
}

impl BackendHandle {
    pub fn mode(&self) -> BackendMode {
        match self {
            BackendHandle::Local(_) => BackendMode::Local,
            BackendHandle::Remote => BackendMode::Remote,
        }
    }
}

impl fmt::Debug for BackendHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendHandle::Local(index) => write!(f, "Local({} docs)", index.len()),
            BackendHandle::Remote => write!(f, "Remote"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    Local,
    Remote,
    #[default]
    Unknown,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendMode::Local => write!(f, "local"),
            BackendMode::Remote => write!(f, "remote"),
            BackendMode::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    #[default]
    Initializing,
    Ready,
    /// Bootstrap itself never finished. Queries still go remote.
    Error,
}

/// Holds the session's backend choice and defers queries until it exists.
pub struct BackendSelector {
    slot: watch::Sender<Option<(BackendHandle, BackendStatus)>>,
}

impl Default for BackendSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendSelector {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot }
    }

    /// Settle the backend. Only the first call has any effect.
    pub fn resolve(&self, handle: BackendHandle) -> bool {
        self.settle(handle, BackendStatus::Ready)
    }

    /// Settle on remote search after the bootstrapper itself died.
    pub fn fail(&self) -> bool {
        self.settle(BackendHandle::Remote, BackendStatus::Error)
    }

    fn settle(&self, handle: BackendHandle, status: BackendStatus) -> bool {
        self.slot.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some((handle, status));
            true
        })
    }

    pub fn current(&self) -> Option<BackendHandle> {
        self.slot.borrow().as_ref().map(|(handle, _)| handle.clone())
    }

    pub fn mode(&self) -> BackendMode {
        self.slot
            .borrow()
            .as_ref()
            .map_or(BackendMode::Unknown, |(handle, _)| handle.mode())
    }

    pub fn status(&self) -> BackendStatus {
        self.slot
            .borrow()
            .as_ref()
            .map_or(BackendStatus::Initializing, |(_, status)| *status)
    }

    /// Wait for the bootstrapper, then hand out the settled backend.
    pub async fn resolved(&self) -> BackendHandle {
        let mut rx = self.slot.subscribe();
        let handle = match rx.wait_for(Option::is_some).await {
            Ok(slot) => slot
                .as_ref()
                .map_or(BackendHandle::Remote, |(handle, _)| handle.clone()),
            // Unreachable while `self` holds the sender
            Err(_) => BackendHandle::Remote,
        };
        handle
    }
}
