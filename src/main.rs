// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use tokio::runtime::Runtime;

use sitesearch::{
    Config, IndexBundle, LocalIndex, RecommendationStatus, ResultFormatter, SearchOptions,
    SessionController, SessionState,
};

mod cli;
use cli::{display, Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    sitesearch::logging::init(cli.verbose, display::use_colors_stderr());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", display::error_prefix(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Search {
            phrases,
            each,
            json,
        } => run_search(cli.connection.resolve()?, &phrases, each, json),
        Commands::Interactive { json } => run_interactive(cli.connection.resolve()?, json),
        Commands::Query {
            bundle,
            phrase,
            limit,
            json,
        } => run_query(&bundle, &phrase, limit, json),
        Commands::Inspect { bundle } => run_inspect(&bundle),
    }
}

fn build_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")
}

fn emit(state: &SessionState, config: &Config, json: bool) -> Result<()> {
    if json {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer(&mut stdout, state)?;
        writeln!(stdout)?;
    } else {
        display::print_state(state, config);
    }
    Ok(())
}

fn run_search(config: Config, phrases: &[String], each: bool, json: bool) -> Result<()> {
    let runtime = build_runtime()?;
    let controller = SessionController::http(config.clone(), runtime.handle().clone());
    controller.open();

    if phrases.is_empty() {
        let mut rx = controller.subscribe();
        let state = runtime.block_on(async {
            rx.wait_for(|s| s.recommendations.status != RecommendationStatus::Loading)
                .await
                .map(|s| s.clone())
        })?;
        emit(&state, &config, json)?;
    }

    for (i, phrase) in phrases.iter().enumerate() {
        controller.on_phrase_change(phrase);
        if each || i + 1 == phrases.len() {
            let state = runtime.block_on(controller.settled());
            emit(&state, &config, json)?;
        }
    }

    controller.close();
    Ok(())
}

fn run_interactive(config: Config, json: bool) -> Result<()> {
    let runtime = build_runtime()?;
    let controller = SessionController::http(config.clone(), runtime.handle().clone());
    controller.open();

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        controller.on_phrase_change(line.trim_end_matches('\r'));
        let state = runtime.block_on(controller.settled());
        emit(&state, &config, json)?;
    }

    controller.close();
    Ok(())
}

fn load_bundle(path: &Path) -> Result<IndexBundle> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    IndexBundle::from_json(&raw).with_context(|| format!("loading {}", path.display()))
}

fn run_query(path: &Path, phrase: &str, limit: usize, json: bool) -> Result<()> {
    let index = LocalIndex::from_bundle(load_bundle(path)?)?;
    let options = SearchOptions {
        limit,
        ..SearchOptions::default()
    };
    let results = ResultFormatter::default().format_all(index.search_matches(phrase, &options));

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        // Offline results have no host to link against
        let config = Config::new("offline");
        display::print_results(&format!("\"{}\"", phrase), &results, &config);
    }
    Ok(())
}

fn run_inspect(path: &Path) -> Result<()> {
    let bundle = load_bundle(path)?;
    let version = bundle.version;

    let mut categories: BTreeMap<String, usize> = BTreeMap::new();
    for doc in &bundle.documents {
        *categories.entry(doc.category.clone()).or_default() += 1;
    }
    let mut categories: Vec<(String, usize)> = categories.into_iter().collect();
    categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let index = LocalIndex::from_bundle(bundle)?;
    display::print_stats(
        &path.display().to_string(),
        version,
        &index.stats(),
        &categories,
    );
    Ok(())
}
