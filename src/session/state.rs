// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Session state and the reducer that mutates it.
//!
//! All mutation goes through [`SessionState::apply`], which decides whether
//! an action is still relevant. The two staleness rules:
//!
//! - results commit only while `active_query` names their query
//! - bootstrap and recommendation outcomes commit only for the current epoch

use crate::backend::{BackendMode, BackendStatus};
use crate::types::DisplayResult;
use serde::Serialize;

/// Coarse lifecycle, derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "mode", rename_all = "lowercase")]
pub enum SessionPhase {
    Closed,
    Initializing,
    Ready(BackendMode),
    /// A query is pending, either in its quiet period or executing.
    Searching(BackendMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStatus {
    #[default]
    Loading,
    Done,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Recommendations {
    pub status: RecommendationStatus,
    pub results: Vec<DisplayResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub open: bool,
    pub epoch: u64,
    pub phrase: String,
    pub results: Vec<DisplayResult>,
    pub backend_status: BackendStatus,
    pub backend_mode: BackendMode,
    /// Token id of the query allowed to commit results, if one is pending.
    pub active_query: Option<u64>,
    pub recommendations: Recommendations,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    Opened {
        epoch: u64,
    },
    Closed,
    PhraseChanged {
        phrase: String,
        query: Option<u64>,
    },
    ResultsSettled {
        query: u64,
        results: Vec<DisplayResult>,
    },
    BackendResolved {
        epoch: u64,
        mode: BackendMode,
        status: BackendStatus,
    },
    RecommendationsLoaded {
        epoch: u64,
        results: Vec<DisplayResult>,
    },
    RecommendationsFailed {
        epoch: u64,
    },
}

impl SessionState {
    /// Apply `action`, returning whether anything changed.
    pub fn apply(&mut self, action: SessionAction) -> bool {
        match action {
            SessionAction::Opened { epoch } => {
                *self = SessionState {
                    open: true,
                    epoch,
                    ..SessionState::default()
                };
                true
            }
            SessionAction::Closed => {
                if *self == SessionState::default() {
                    return false;
                }
                *self = SessionState::default();
                true
            }
            SessionAction::PhraseChanged { phrase, query } => {
                if !self.open {
                    return false;
                }
                self.phrase = phrase;
                self.active_query = query;
                if query.is_none() {
                    self.results.clear();
                }
                true
            }
            SessionAction::ResultsSettled { query, results } => {
                if !self.open || self.active_query != Some(query) {
                    return false;
                }
                self.results = results;
                self.active_query = None;
                true
            }
            SessionAction::BackendResolved {
                epoch,
                mode,
                status,
            } => {
                if !self.is_current(epoch) {
                    return false;
                }
                self.backend_mode = mode;
                self.backend_status = status;
                true
            }
            SessionAction::RecommendationsLoaded { epoch, results } => {
                if !self.is_current(epoch) {
                    return false;
                }
                self.recommendations = Recommendations {
                    status: RecommendationStatus::Done,
                    results,
                };
                true
            }
            SessionAction::RecommendationsFailed { epoch } => {
                if !self.is_current(epoch) {
                    return false;
                }
                self.recommendations = Recommendations {
                    status: RecommendationStatus::Error,
                    results: Vec::new(),
                };
                true
            }
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.open && self.epoch == epoch
    }

    pub fn phase(&self) -> SessionPhase {
        if !self.open {
            SessionPhase::Closed
        } else if self.backend_status == BackendStatus::Initializing {
            SessionPhase::Initializing
        } else if self.active_query.is_some() {
            SessionPhase::Searching(self.backend_mode)
        } else {
            SessionPhase::Ready(self.backend_mode)
        }
    }

    /// Open, bootstrapped, and nothing pending.
    pub fn is_settled(&self) -> bool {
        self.open && self.backend_status != BackendStatus::Initializing && self.active_query.is_none()
    }
}
