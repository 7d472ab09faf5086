// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy search: typo tolerance via edit distance.
//!
//! The local vocabulary of a site index is small (a few thousand terms), so a
//! bounded Levenshtein scan over it is fast enough for search-as-you-type.

mod levenshtein;

pub use levenshtein::*;
