//! Formatting of raw matches into display results.

use super::common::*;
use sitesearch::{
    excerpt, highlight, Config, DisplayResult, LocalIndex, MatchSource, RawMatch, ResultFormatter,
    SearchOptions,
};

fn index_match(title: &str, text: &str, terms: &[&str]) -> RawMatch {
    RawMatch {
        uri: "/doc".to_string(),
        title: title.to_string(),
        text: text.to_string(),
        category: "Guides".to_string(),
        thumbnail: Some("/thumb.png".to_string()),
        matched_terms: terms.iter().map(|t| t.to_string()).collect(),
        source: MatchSource::Index,
    }
}

#[test]
fn test_longest_term_highlighted_once() {
    assert_eq!(
        highlight("category", &["cat", "category"]),
        "<mark>category</mark>"
    );
    assert_eq!(
        highlight("cat category", &["cat", "category"]),
        "<mark>cat</mark> <mark>category</mark>"
    );
}

#[test]
fn test_text_without_matches_unchanged() {
    let text = "Nothing to see here, move along.";
    assert_eq!(highlight(text, &["zebra", "giraffe"]), text);
}

#[test]
fn test_cat_sat_on_the_mat() {
    assert_eq!(
        excerpt("The cat sat on the mat", &["cat"], 80),
        "<mark>cat</mark> sat on the mat..."
    );
}

#[test]
fn test_excerpt_window_is_eighty_tokens() {
    let words: Vec<String> = (0..300).map(|i| format!("w{}", i)).collect();
    let text = format!("{} needle {}", words[..100].join(" "), words[100..].join(" "));

    let out = excerpt(&text, &["needle"], 80);
    assert!(out.starts_with("<mark>needle</mark> w100 "));
    assert!(out.ends_with(" w178..."));
    assert_eq!(out.trim_end_matches("...").split(' ').count(), 80);
}

#[test]
fn test_formatter_keeps_category_and_thumbnail() {
    let formatted = ResultFormatter::default().format(index_match(
        "Rust guide",
        "learn rust today",
        &["rust"],
    ));
    assert_eq!(formatted.title, "<mark>Rust</mark> guide");
    assert_eq!(formatted.excerpt, "<mark>rust</mark> today...");
    assert_eq!(formatted.category, "Guides");
    assert_eq!(formatted.thumbnail.as_deref(), Some("/thumb.png"));
}

#[test]
fn test_formatter_without_terms() {
    let formatted = ResultFormatter::new(3).format(index_match("Title", "a b c d e", &[]));
    assert_eq!(formatted.title, "Title");
    assert_eq!(formatted.excerpt, "a b c...");
}

#[test]
fn test_index_results_end_to_end() {
    let index = LocalIndex::from_bundle(make_bundle(sample_documents())).unwrap();
    let results = ResultFormatter::default()
        .format_all(index.search_matches("borrow", &SearchOptions::default()));

    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].excerpt,
        "<mark>borrow</mark> checker explained..."
    );
}

#[test]
fn test_result_links() {
    let result = DisplayResult {
        uri: "/".to_string(),
        title: "Home".to_string(),
        excerpt: String::new(),
        category: String::new(),
        thumbnail: None,
    };
    let mut config = Config::new("k");
    assert_eq!(result.href(&config), "/");
    assert_eq!(result.display_uri(), "homepage");
    assert!(!result.opens_in_new_tab(&config));

    config.result_base_url = "https://docs.example.com".to_string();
    assert_eq!(result.href(&config), "https://docs.example.com/");
    assert!(result.opens_in_new_tab(&config));
}
