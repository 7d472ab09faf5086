// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Subscriber setup for the `sitesearch` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's call. Logs go to stderr so stdout stays clean for results.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "sitesearch=info";

/// Filter directive for a `-v` count. `RUST_LOG` still wins when set.
pub fn filter_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => DEFAULT_FILTER,
        1 => "sitesearch=debug",
        _ => "sitesearch=trace",
    }
}

/// Install the global subscriber. Returns false if one was already set.
pub fn init(verbose: u8, ansi: bool) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_target(true),
        )
        .try_init()
        .is_ok()
}
