// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the sitesearch CLI.
//!
//! Results render as a box per query, `<mark>` spans become bold yellow on a
//! terminal and plain text everywhere else. Respects `NO_COLOR` and non-TTY
//! detection for pipelines.

use sitesearch::{
    Config, DisplayResult, IndexStats, RecommendationStatus, SessionPhase, SessionState,
};

// Width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 80;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const GRAY: &str = "\x1b[90m";

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

fn no_color() -> bool {
    std::env::var_os("NO_COLOR").is_some()
}

/// Check if stdout should get colors (TTY detection)
pub fn use_colors() -> bool {
    !no_color() && atty::is(atty::Stream::Stdout)
}

/// Same check for stderr, where logs go
pub fn use_colors_stderr() -> bool {
    !no_color() && atty::is(atty::Stream::Stderr)
}

/// Apply styles if TTY, otherwise return plain text
pub fn styled(styles: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", styles.join(""), text, RESET)
    } else {
        text.to_string()
    }
}

/// Calculate visible length (excluding ANSI codes)
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

/// Turn highlight spans into terminal styling, or drop them.
pub fn render_marks(text: &str, colors: bool) -> String {
    if colors {
        let open = format!("{}{}", BOLD, YELLOW);
        text.replace(MARK_OPEN, &open).replace(MARK_CLOSE, RESET)
    } else {
        text.replace(MARK_OPEN, "").replace(MARK_CLOSE, "")
    }
}

/// Cut `text` to at most `width` visible characters, ending in "…" if cut.
pub fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

fn border(text: &str) -> String {
    styled(&[GRAY], text)
}

/// Print a content line: │ content          │
pub fn row(content: &str) {
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!("{}{}{}{}", border("│"), content, " ".repeat(pad), border("│"));
}

/// Print section header: ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let label_part = format!("─ {} ", styled(&[CYAN, BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!(
        "{}{}{}",
        border("┌"),
        label_part,
        border(&format!("{}┐", "─".repeat(remaining)))
    );
}

/// Print section footer: └──────────────────┘
pub fn section_bot() {
    println!("{}", border(&format!("└{}┘", "─".repeat(BOX_WIDTH))));
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

pub fn phase_badge(phase: SessionPhase) -> String {
    let (color, label) = match phase {
        SessionPhase::Closed => (GRAY, "closed".to_string()),
        SessionPhase::Initializing => (YELLOW, "initializing".to_string()),
        SessionPhase::Ready(mode) => (GREEN, format!("ready · {}", mode)),
        SessionPhase::Searching(mode) => (CYAN, format!("searching · {}", mode)),
    };
    styled(&[color], &format!("[{}]", label))
}

pub fn error_prefix() -> String {
    if use_colors_stderr() {
        format!("{}{}error:{}", BOLD, RED, RESET)
    } else {
        "error:".to_string()
    }
}

/// Print one result as a few box rows: title, link, excerpt.
fn result_rows(result: &DisplayResult, config: &Config, colors: bool) {
    let width = BOX_WIDTH - 2;

    let title = render_marks(&clip(&result.title, width), colors);
    row(&format!(" {}", styled(&[BOLD], &title)));

    let mut link = result.href(config);
    if result.opens_in_new_tab(config) {
        link.push_str(" ↗");
    }
    let category = if result.category.is_empty() {
        String::new()
    } else {
        format!("{} · ", result.category)
    };
    row(&format!(
        " {}",
        styled(
            &[DIM],
            &clip(&format!("{}{} ({})", category, result.display_uri(), link), width)
        )
    ));

    // Clip before styling so escape codes never get cut in half
    let plain = render_marks(&result.excerpt, false);
    if !plain.is_empty() {
        let clipped = clip(&plain, width);
        let excerpt = if colors && clipped == plain {
            render_marks(&result.excerpt, true)
        } else {
            clipped
        };
        row(&format!(" {}", excerpt));
    }
}

pub fn print_results(label: &str, results: &[DisplayResult], config: &Config) {
    let colors = use_colors();
    section_top(label);
    if results.is_empty() {
        row(&format!(" {}", styled(&[DIM], "no results")));
    }
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            row("");
        }
        result_rows(result, config, colors);
    }
    section_bot();
}

pub fn print_state(state: &SessionState, config: &Config) {
    let label = if state.phrase.is_empty() {
        format!("{} recommendations", phase_badge(state.phase()))
    } else {
        format!("{} \"{}\"", phase_badge(state.phase()), state.phrase)
    };

    if state.phrase.is_empty() {
        match state.recommendations.status {
            RecommendationStatus::Done => {
                print_results(&label, &state.recommendations.results, config);
            }
            // The panel renders nothing while loading or after a failure
            RecommendationStatus::Loading | RecommendationStatus::Error => {
                section_top(&label);
                section_bot();
            }
        }
    } else {
        print_results(&label, &state.results, config);
    }
}

pub fn print_stats(path: &str, version: u32, stats: &IndexStats, categories: &[(String, usize)]) {
    section_top("INDEX BUNDLE");
    row(&format!(" file       {}", path));
    row(&format!(" version    {}", version));
    row(&format!(" documents  {}", stats.documents));
    row(&format!(" terms      {}", stats.terms));
    row(&format!(" postings   {}", stats.postings));
    if !categories.is_empty() {
        row("");
        row(&format!(" {}", styled(&[BOLD], "categories")));
        for (name, count) in categories {
            let name = if name.is_empty() { "(none)" } else { name };
            row(&format!("   {:<24} {:>6}", clip(name, 24), count));
        }
    }
    section_bot();
}
