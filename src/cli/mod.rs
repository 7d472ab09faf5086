// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the sitesearch command-line interface.
//!
//! Four subcommands. `search` and `interactive` drive a real session against
//! the service (debounce, backend selection, formatting, all of it).
//! `query` and `inspect` work offline on a downloaded index bundle.

pub mod display;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sitesearch::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sitesearch",
    about = "Search-as-you-type client for hosted site search",
    version
)]
pub struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the service lives and which key to use.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Widget config JSON (accessKey, apiBaseUrl, resultBaseUrl, ...)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Access key; overrides the config file
    #[arg(short, long, global = true, env = "SITESEARCH_KEY")]
    pub key: Option<String>,

    /// Search API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Prefix for result links
    #[arg(long, global = true)]
    pub result_base_url: Option<String>,

    /// Local index bundle URL override
    #[arg(long, global = true)]
    pub index_url: Option<String>,
}

impl ConnectionArgs {
    /// File values first, flags on top.
    pub fn resolve(&self) -> Result<Config> {
        let mut config = match (&self.config, &self.key) {
            (Some(path), _) => Config::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            (None, Some(key)) => Config::new(key.clone()),
            (None, None) => bail!("no access key: pass --key or --config"),
        };

        if let Some(key) = &self.key {
            config.access_key = key.clone();
        }
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(url) = &self.result_base_url {
            config.result_base_url = url.clone();
        }
        if let Some(url) = &self.index_url {
            config.index_url = Some(url.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Type phrases into a live session and print the settled results
    ///
    /// Phrases are entered in order as if typed, so only the last one
    /// normally survives the debounce. With no phrases, prints the
    /// recommendations panel instead.
    Search {
        phrases: Vec<String>,

        /// Wait for results after every phrase instead of only the last
        #[arg(long)]
        each: bool,

        /// Print the session state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read phrases from stdin, one per line, printing each settled state
    Interactive {
        /// Print the session state as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Query a local index bundle file without any network access
    Query {
        /// Path to the bundle JSON
        bundle: PathBuf,

        /// Search phrase
        phrase: String,

        /// Maximum number of results to return
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show statistics for a local index bundle file
    Inspect {
        /// Path to the bundle JSON
        bundle: PathBuf,
    },
}
