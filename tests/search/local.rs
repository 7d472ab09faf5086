//! Local index: ranking, term expansion, bundle loading.

use super::common::*;
use sitesearch::{BundleError, IndexBundle, LocalIndex, SearchError, SearchOptions};

fn sample_index() -> LocalIndex {
    LocalIndex::from_bundle(make_bundle(sample_documents())).unwrap()
}

fn top_uri(index: &LocalIndex, phrase: &str) -> Option<String> {
    index
        .search_matches(phrase, &SearchOptions::default())
        .first()
        .map(|m| m.uri.clone())
}

#[test]
fn test_prefix_reaches_longer_terms() {
    let index = sample_index();
    let matches = index.search_matches("searc", &SearchOptions::default());
    assert!(matches.iter().any(|m| m.uri == "/docs/search"));
    assert!(matches[0].matched_terms.iter().any(|t| t.starts_with("searc")));
}

#[test]
fn test_fuzzy_tolerates_typos() {
    let index = sample_index();
    assert_eq!(top_uri(&index, "ownrship").as_deref(), Some("/docs/rust"));
    assert_eq!(top_uri(&index, "documantation").as_deref(), Some("/docs/search"));
}

#[test]
fn test_short_terms_are_exact_only() {
    let index = sample_index();
    // "mat" is a token; "ma" prefixes it but is too short to expand
    assert!(top_uri(&index, "mat").is_some());
    assert!(top_uri(&index, "ma").is_none());
}

#[test]
fn test_any_term_qualifies() {
    let index = sample_index();
    let uris: Vec<String> = index
        .search_matches("borrow welcome", &SearchOptions::default())
        .into_iter()
        .map(|m| m.uri)
        .collect();
    assert!(uris.contains(&"/docs/rust".to_string()));
    assert!(uris.contains(&"/".to_string()));
}

#[test]
fn test_diacritics_fold() {
    let index = LocalIndex::from_bundle(make_bundle(vec![make_doc(
        "/cafe",
        "Café culture",
        "Crème brûlée and naïve résumé writing",
    )]))
    .unwrap();
    assert_eq!(top_uri(&index, "cafe").as_deref(), Some("/cafe"));
    assert_eq!(top_uri(&index, "CRÈME").as_deref(), Some("/cafe"));
}

#[test]
fn test_matched_terms_are_document_terms() {
    let index = sample_index();
    let matches = index.search_matches("rust", &SearchOptions::default());
    let rust = matches.iter().find(|m| m.uri == "/docs/rust").unwrap();
    assert!(rust.matched_terms.contains(&"rust".to_string()));
    assert!(rust.matched_terms.contains(&"rustic".to_string()));
}

#[test]
fn test_bundle_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bundle.json");
    std::fs::write(&path, bundle_json(sample_documents())).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let index = LocalIndex::from_json(&raw).unwrap();
    assert_eq!(index.len(), 4);
    assert_eq!(index.stats().documents, 4);
    assert!(index.stats().terms > 10);
}

#[test]
fn test_bundle_rejections() {
    let err = IndexBundle::from_json("[]").unwrap_err();
    assert!(matches!(err, SearchError::Malformed { .. }));

    let dup = make_bundle(vec![make_doc("/a", "A", "x"), make_doc("/a", "B", "y")]);
    assert_eq!(
        LocalIndex::from_bundle(dup).unwrap_err(),
        BundleError::DuplicateUri {
            uri: "/a".to_string()
        }
    );

    let blank = make_bundle(vec![make_doc("", "A", "x")]);
    assert_eq!(
        LocalIndex::from_bundle(blank).unwrap_err(),
        BundleError::MissingUri { position: 0 }
    );
}
