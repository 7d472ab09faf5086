// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Edit distance with an early-exit optimization.
//!
//! `|len(a) - len(b)|` is a lower bound on edit distance. If two strings
//! differ in length by more than the budget, skip the O(nm) DP entirely.
//! The DP itself is abandoned as soon as a whole row exceeds the budget.

/// Edit budget for a term under a fractional fuzziness setting.
///
/// `ratio` is a fraction of the term's character length, rounded to the
/// nearest whole edit and capped at `cap`. A 0.2 ratio gives 1 edit for
/// 4-7 character terms and 2 edits for 8-12 character terms.
pub fn edit_budget(term_len: usize, ratio: f64, cap: usize) -> usize {
    if ratio <= 0.0 {
        return 0;
    }
    let budget = (term_len as f64 * ratio).round() as usize;
    budget.min(cap)
}

/// Edit distance between `a` and `b` if it is at most `max`.
///
/// Returns `None` as soon as the distance is known to exceed `max`.
pub fn bounded_distance(a: &str, b: &str, max: usize) -> Option<usize> {
    // Character counts, not byte lengths, for Unicode correctness
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) > max {
        return None;
    }

    let mut dp: Vec<usize> = (0..=b.len()).collect();
    for (i, ac) in a.iter().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;
        let mut min_row = dp[0];

        for (j, bc) in b.iter().enumerate() {
            let temp = dp[j + 1];
            let cost = usize::from(ac != bc);
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = temp;
            min_row = min_row.min(dp[j + 1]);
        }

        if min_row > max {
            return None;
        }
    }

    let distance = dp[b.len()];
    (distance <= max).then_some(distance)
}

/// Are these strings within `max` edits of each other?
#[inline]
pub fn levenshtein_within(a: &str, b: &str, max: usize) -> bool {
    bounded_distance(a, b, max).is_some()
}
