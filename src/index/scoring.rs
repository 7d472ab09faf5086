// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Relevance scoring for local index hits.
//!
//! BM25 per (term, field), multiplied by a field boost and by how the term
//! was reached. Exact beats prefix beats fuzzy for the same document term,
//! and a closer derived term beats a farther one.
//!
//! | Match  | Weight |
//! |--------|--------|
//! | Exact  | 1.0    |
//! | Prefix | 0.375 × len(q) / (len(q) + 0.3 × extra chars) |
//! | Fuzzy  | 0.45 × len(q) / (len(q) + distance) |

use super::Field;

pub const BM25_K1: f64 = 1.2;
pub const BM25_B: f64 = 0.7;

pub const EXACT_WEIGHT: f64 = 1.0;
pub const PREFIX_WEIGHT: f64 = 0.375;
pub const FUZZY_WEIGHT: f64 = 0.45;

/// Boost applied to every hit in a field.
pub fn field_boost(field: Field) -> f64 {
    match field {
        Field::Title => 2.0,
        Field::Tags => 1.5,
        Field::Category => 1.0,
        Field::Text => 1.0,
    }
}

/// Weight for a vocabulary term reached by prefix expansion.
pub fn prefix_weight(query_len: usize, term_len: usize) -> f64 {
    let extra = term_len.saturating_sub(query_len) as f64;
    let q = query_len as f64;
    PREFIX_WEIGHT * q / (q + 0.3 * extra)
}

/// Weight for a vocabulary term reached by fuzzy matching.
pub fn fuzzy_weight(query_len: usize, distance: usize) -> f64 {
    let q = query_len as f64;
    FUZZY_WEIGHT * q / (q + distance as f64)
}

/// Okapi BM25 for one posting.
pub fn bm25(
    term_freq: u32,
    doc_freq: usize,
    total_docs: usize,
    field_len: u32,
    avg_field_len: f64,
) -> f64 {
    let n = total_docs as f64;
    let df = doc_freq as f64;
    let idf = (1.0 + (n - df + 0.5) / (df + 0.5)).ln();

    let tf = f64::from(term_freq);
    let norm = if avg_field_len > 0.0 {
        f64::from(field_len) / avg_field_len
    } else {
        1.0
    };
    idf * tf * (BM25_K1 + 1.0) / (tf + BM25_K1 * (1.0 - BM25_B + BM25_B * norm))
}
