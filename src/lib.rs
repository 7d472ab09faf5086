// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search-as-you-type sessions for a hosted site search service.
//!
//! A session turns keystrokes into debounced queries, routes them to a local
//! in-memory index or the remote search API, and publishes formatted,
//! highlighted results. Results from superseded queries never reach the
//! published state.
//!
//! # Architecture
//!
//! ```text
//!                  open()                        on_phrase_change()
//!                    │                                   │
//!                    ▼                                   ▼
//! ┌──────────────────────────┐        ┌────────────────────────────┐
//! │ bootstrap.rs             │        │ debounce.rs                │
//! │ /v1/config ─▶ bundle ─▶  │        │ QueryDebouncer (240 ms,    │
//! │ LocalIndex | Remote      │        │ QueryToken cancellation)   │
//! └────────────┬─────────────┘        └─────────────┬──────────────┘
//!              │ resolve                            │ quiet period over
//!              ▼                                    ▼
//! ┌──────────────────────────┐ awaits ┌────────────────────────────┐
//! │ backend.rs               │◀───────│ executor.rs                │
//! │ BackendSelector          │        │ local: index/  remote: api │
//! └──────────────────────────┘        └─────────────┬──────────────┘
//!                                                   │ RawMatch
//!                                                   ▼
//! ┌──────────────────────────┐        ┌────────────────────────────┐
//! │ session/                 │◀───────│ format.rs                  │
//! │ SessionState reducer     │ commit │ highlight + excerpt        │
//! │ watch::Sender            │        └────────────────────────────┘
//! └──────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use sitesearch::{Config, SessionController};
//!
//! let controller = SessionController::http(Config::new("key"), runtime.handle().clone());
//! controller.open();
//! controller.on_phrase_change("borrow checker");
//! let state = controller.settled().await;
//! for result in &state.results {
//!     println!("{} {}", result.title, result.href(controller.config()));
//! }
//! ```

pub mod api;
pub mod backend;
pub mod bootstrap;
pub mod config;
pub mod debounce;
pub mod error;
pub mod executor;
pub mod format;
mod fuzzy;
pub mod index;
pub mod logging;
pub mod metrics;
pub mod session;
pub mod testing;
mod types;
mod utils;

pub use api::{HttpApi, LicenseMode, SearchApi};
pub use backend::{BackendHandle, BackendMode, BackendSelector, BackendStatus};
pub use bootstrap::initialize;
pub use config::{Config, SessionOptions};
pub use debounce::{Debouncer, QueryDebouncer, QueryToken};
pub use error::{BundleError, Result, SearchError};
pub use executor::SearchExecutor;
pub use format::{excerpt, highlight, ResultFormatter};
pub use fuzzy::levenshtein_within;
pub use index::{IndexBundle, IndexHit, IndexStats, LocalIndex, SearchOptions};
pub use metrics::MetricsReporter;
pub use session::{
    RecommendationStatus, Recommendations, SessionAction, SessionController, SessionPhase,
    SessionState,
};
pub use types::{DisplayResult, MatchSource, RawMatch, RemoteHit};
pub use utils::{normalize, tokenize};
