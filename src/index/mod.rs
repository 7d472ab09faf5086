// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The local full-text index used in client mode.
//!
//! Built once from an [`IndexBundle`] and read-only afterwards, so one
//! `Arc<LocalIndex>` can serve every query of a session without locking.
//!
//! # Lookup
//!
//! Each query term is expanded in three steps, in this order:
//!
//! 1. **Exact**: hash lookup in the postings map.
//! 2. **Prefix**: binary search into the sorted vocabulary, then a forward
//!    scan while entries share the prefix. "rust" reaches "rustic".
//! 3. **Fuzzy**: bounded Levenshtein over the vocabulary. "ryst" reaches "rust".
//!
//! Steps 2 and 3 only run for terms longer than
//! [`SearchOptions::expand_min_len`] characters; short terms must match
//! exactly, otherwise "a" would prefix-match half the vocabulary.
//!
//! # Invariants
//!
//! - `vocabulary` is sorted and holds exactly the keys of `postings`
//! - every posting's `doc` is `< documents.len()`
//! - every posting list is non-empty and sorted by `(doc, field)`

mod bundle;
pub mod scoring;

pub use bundle::{BundleDocument, IndexBundle, BUNDLE_VERSION};

use crate::error::{BundleError, Result};
use crate::fuzzy::{bounded_distance, edit_budget};
use crate::types::{MatchSource, RawMatch};
use crate::utils::{char_len, tokenize};
use std::collections::{HashMap, HashSet};

/// Indexed document fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title = 0,
    Text = 1,
    Category = 2,
    Tags = 3,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Text, Field::Category, Field::Tags];

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

/// Query-time matching knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Terms longer than this many characters get prefix and fuzzy matching.
    pub expand_min_len: usize,
    /// Fuzzy budget as a fraction of the term length.
    pub fuzzy_ratio: f64,
    /// Upper bound on the fuzzy budget regardless of term length.
    pub max_fuzzy: usize,
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            expand_min_len: 3,
            fuzzy_ratio: 0.2,
            max_fuzzy: 6,
            limit: 50,
        }
    }
}

impl SearchOptions {
    pub fn allows_prefix(&self, term: &str) -> bool {
        char_len(term) > self.expand_min_len
    }

    /// Edit budget for `term`; 0 means exact only.
    pub fn fuzzy_budget(&self, term: &str) -> usize {
        let len = char_len(term);
        if len <= self.expand_min_len {
            return 0;
        }
        edit_budget(len, self.fuzzy_ratio, self.max_fuzzy)
    }
}

/// Stored fields returned with a hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub uri: String,
    pub title: String,
    pub text: String,
    pub category: String,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Posting {
    doc: u32,
    field: Field,
    term_freq: u32,
}

/// A scored document hit. `terms` are the document terms that matched,
/// highest contribution first.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
    pub doc: usize,
    pub score: f64,
    pub terms: Vec<String>,
}

/// Summary numbers for `sitesearch inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub documents: usize,
    pub terms: usize,
    pub postings: usize,
}

#[derive(Debug)]
pub struct LocalIndex {
    documents: Vec<StoredDocument>,
    postings: HashMap<String, Vec<Posting>>,
    doc_freq: HashMap<String, usize>,
    vocabulary: Vec<String>,
    field_lengths: Vec<[u32; 4]>,
    avg_field_len: [f64; 4],
}

#[derive(Default)]
struct Accumulator {
    score: f64,
    terms: Vec<(String, f64)>,
}

impl LocalIndex {
    pub fn from_json(raw: &str) -> Result<Self> {
        let bundle = IndexBundle::from_json(raw)?;
        Ok(Self::build(bundle))
    }

    pub fn from_bundle(bundle: IndexBundle) -> std::result::Result<Self, BundleError> {
        bundle.validate()?;
        Ok(Self::build(bundle))
    }

    fn build(bundle: IndexBundle) -> Self {
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut documents = Vec::with_capacity(bundle.documents.len());
        let mut field_lengths = Vec::with_capacity(bundle.documents.len());

        for (doc, source) in bundle.documents.into_iter().enumerate() {
            let doc = doc as u32;
            let tags = source.tags.join(" ");
            let mut lengths = [0u32; 4];

            for field in Field::ALL {
                let value = match field {
                    Field::Title => source.title.as_str(),
                    Field::Text => source.text.as_str(),
                    Field::Category => source.category.as_str(),
                    Field::Tags => tags.as_str(),
                };
                let tokens = tokenize(value);
                lengths[field.slot()] = tokens.len() as u32;

                let mut freqs: HashMap<String, u32> = HashMap::new();
                for token in tokens {
                    *freqs.entry(token).or_default() += 1;
                }
                for (term, term_freq) in freqs {
                    postings.entry(term).or_default().push(Posting {
                        doc,
                        field,
                        term_freq,
                    });
                }
            }

            field_lengths.push(lengths);
            documents.push(StoredDocument {
                uri: source.uri,
                title: source.title,
                text: source.text,
                category: source.category,
                thumbnail: source.thumbnail,
            });
        }

        let mut doc_freq = HashMap::with_capacity(postings.len());
        for (term, list) in &mut postings {
            list.sort();
            let mut docs: Vec<u32> = list.iter().map(|p| p.doc).collect();
            docs.dedup();
            doc_freq.insert(term.clone(), docs.len());
        }

        let mut vocabulary: Vec<String> = postings.keys().cloned().collect();
        vocabulary.sort();

        let mut avg_field_len = [0.0f64; 4];
        if !field_lengths.is_empty() {
            for field in Field::ALL {
                let total: u64 = field_lengths
                    .iter()
                    .map(|l| u64::from(l[field.slot()]))
                    .sum();
                avg_field_len[field.slot()] = total as f64 / field_lengths.len() as f64;
            }
        }

        LocalIndex {
            documents,
            postings,
            doc_freq,
            vocabulary,
            field_lengths,
            avg_field_len,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn document(&self, doc: usize) -> Option<&StoredDocument> {
        self.documents.get(doc)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.documents.len(),
            terms: self.vocabulary.len(),
            postings: self.postings.values().map(Vec::len).sum(),
        }
    }

    /// Vocabulary terms reachable from one query term, with their match weight.
    ///
    /// Ordered exact, then prefix, then fuzzy; within a step by weight.
    /// A vocabulary term appears at most once, at its best weight.
    fn expand(&self, term: &str, options: &SearchOptions) -> Vec<(&str, f64)> {
        let mut expansions: Vec<(&str, f64)> = Vec::new();

        if let Some((key, _)) = self.postings.get_key_value(term) {
            expansions.push((key.as_str(), scoring::EXACT_WEIGHT));
        }

        let query_len = char_len(term);

        if options.allows_prefix(term) {
            let start = self.vocabulary.partition_point(|v| v.as_str() < term);
            let mut prefixed: Vec<(&str, f64)> = self.vocabulary[start..]
                .iter()
                .take_while(|v| v.starts_with(term))
                .filter(|v| v.as_str() != term)
                .map(|v| (v.as_str(), scoring::prefix_weight(query_len, char_len(v))))
                .collect();
            prefixed.sort_by(|a, b| b.1.total_cmp(&a.1));
            expansions.extend(prefixed);
        }

        let budget = options.fuzzy_budget(term);
        if budget > 0 {
            let mut fuzzy: Vec<(&str, f64)> = self
                .vocabulary
                .iter()
                .filter(|v| v.as_str() != term)
                .filter_map(|v| {
                    bounded_distance(term, v, budget)
                        .map(|d| (v.as_str(), scoring::fuzzy_weight(query_len, d)))
                })
                .collect();
            fuzzy.sort_by(|a, b| b.1.total_cmp(&a.1));
            for (candidate, weight) in fuzzy {
                match expansions.iter_mut().find(|(t, _)| *t == candidate) {
                    Some(existing) => existing.1 = existing.1.max(weight),
                    None => expansions.push((candidate, weight)),
                }
            }
        }

        expansions
    }

    /// Rank documents for a phrase. Any matching term qualifies a document.
    pub fn search(&self, phrase: &str, options: &SearchOptions) -> Vec<IndexHit> {
        let mut query_terms = tokenize(phrase);
        let mut seen = HashSet::new();
        query_terms.retain(|t| seen.insert(t.clone()));

        if query_terms.is_empty() || self.documents.is_empty() {
            return Vec::new();
        }

        let total_docs = self.documents.len();
        let mut accumulators: HashMap<u32, Accumulator> = HashMap::new();

        for query_term in &query_terms {
            for (term, weight) in self.expand(query_term, options) {
                let Some(list) = self.postings.get(term) else {
                    continue;
                };
                let doc_freq = self.doc_freq.get(term).copied().unwrap_or(list.len());

                for posting in list {
                    let slot = posting.field.slot();
                    let field_len = self.field_lengths[posting.doc as usize][slot];
                    let contribution = weight
                        * scoring::field_boost(posting.field)
                        * scoring::bm25(
                            posting.term_freq,
                            doc_freq,
                            total_docs,
                            field_len,
                            self.avg_field_len[slot],
                        );

                    let acc = accumulators.entry(posting.doc).or_default();
                    acc.score += contribution;
                    match acc.terms.iter_mut().find(|(t, _)| t.as_str() == term) {
                        Some(existing) => existing.1 += contribution,
                        None => acc.terms.push((term.to_string(), contribution)),
                    }
                }
            }
        }

        let mut hits: Vec<IndexHit> = accumulators
            .into_iter()
            .map(|(doc, mut acc)| {
                // Stable: equal contributions keep query order
                acc.terms.sort_by(|a, b| b.1.total_cmp(&a.1));
                IndexHit {
                    doc: doc as usize,
                    score: acc.score,
                    terms: acc.terms.into_iter().map(|(t, _)| t).collect(),
                }
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.doc.cmp(&b.doc)));
        hits.truncate(options.limit);
        hits
    }

    /// Search and resolve hits into backend-agnostic matches.
    pub fn search_matches(&self, phrase: &str, options: &SearchOptions) -> Vec<RawMatch> {
        self.search(phrase, options)
            .into_iter()
            .filter_map(|hit| {
                let doc = self.documents.get(hit.doc)?;
                Some(RawMatch {
                    uri: doc.uri.clone(),
                    title: doc.title.clone(),
                    text: doc.text.clone(),
                    category: doc.category.clone(),
                    thumbnail: doc.thumbnail.clone(),
                    matched_terms: hit.terms,
                    source: MatchSource::Index,
                })
            })
            .collect()
    }
}
