//! Open/close lifecycle and backend selection.

use super::common::*;
use sitesearch::testing::FakeApi;
use sitesearch::{BackendMode, BackendStatus, SessionPhase, SessionState};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_open_starts_initializing_then_ready_remote() {
    let (controller, api) = controller(FakeApi::server());
    assert_eq!(controller.phase(), SessionPhase::Closed);

    controller.open();
    assert!(controller.is_open());
    assert_eq!(controller.phase(), SessionPhase::Initializing);

    let state = controller.settled().await;
    assert_eq!(state.phase(), SessionPhase::Ready(BackendMode::Remote));
    assert_eq!(state.backend_status, BackendStatus::Ready);
    assert!(!api.calls().contains(&ApiCall::IndexBundle));
}

#[tokio::test(start_paused = true)]
async fn test_client_mode_searches_locally() {
    let (controller, api) = controller(FakeApi::client(bundle_json(sample_documents())));
    let state = open_ready(&controller).await;
    assert_eq!(state.backend_mode, BackendMode::Local);

    controller.on_phrase_change("cat");
    let state = controller.settled().await;

    assert_eq!(uris(&state), vec!["/blog/cats"]);
    assert_eq!(
        state.results[0].excerpt,
        "<mark>cat</mark> sat on the mat while the category page loaded..."
    );
    assert!(api.search_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_bad_bundle_falls_back_to_remote() {
    let (controller, api) = controller(
        FakeApi::client("{ not json").with_hits("cat", vec![hit("/remote/cat", "Remote cat")]),
    );
    let state = open_ready(&controller).await;
    assert_eq!(state.phase(), SessionPhase::Ready(BackendMode::Remote));

    controller.on_phrase_change("cat");
    let state = controller.settled().await;
    assert_eq!(uris(&state), vec!["/remote/cat"]);
    assert_eq!(api.search_calls(), vec!["cat"]);
}

#[tokio::test(start_paused = true)]
async fn test_missing_bundle_falls_back_to_remote() {
    let (controller, _api) = controller(FakeApi::client("").without_bundle());
    let state = open_ready(&controller).await;
    assert_eq!(state.backend_mode, BackendMode::Remote);
    assert_eq!(state.backend_status, BackendStatus::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_queries_wait_for_bootstrap() {
    let (controller, api) = controller(
        FakeApi::server()
            .with_bootstrap_delay(Duration::from_secs(1))
            .with_hits("rust", vec![hit("/rust", "Rust")]),
    );
    controller.open();
    controller.on_phrase_change("rust");

    // Quiet period is over but the backend isn't known yet
    wait_ms(500).await;
    assert!(api.search_calls().is_empty());
    assert_eq!(controller.phase(), SessionPhase::Initializing);

    let state = controller.settled().await;
    assert_eq!(uris(&state), vec!["/rust"]);
    assert_eq!(api.search_calls(), vec!["rust"]);
}

#[tokio::test(start_paused = true)]
async fn test_empty_phrase_clears_results_immediately() {
    let (controller, api) =
        controller(FakeApi::server().with_hits("rust", vec![hit("/rust", "Rust")]));
    open_ready(&controller).await;

    controller.on_phrase_change("rust");
    assert_eq!(controller.settled().await.results.len(), 1);

    controller.on_phrase_change("");
    let state = controller.snapshot();
    assert!(state.results.is_empty());
    assert_eq!(state.phase(), SessionPhase::Ready(BackendMode::Remote));

    wait_ms(2_000).await;
    assert_eq!(api.search_calls(), vec!["rust"]);
}

#[tokio::test(start_paused = true)]
async fn test_whitespace_phrase_counts_as_empty() {
    let (controller, api) = controller(FakeApi::server());
    open_ready(&controller).await;

    controller.on_phrase_change("   ");
    assert_eq!(controller.snapshot().active_query, None);
    wait_ms(1_000).await;
    assert!(api.search_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_open_empty_close_makes_no_calls() {
    let (controller, api) = controller(FakeApi::server());
    controller.open();
    controller.on_phrase_change("");
    controller.close();

    wait_ms(5_000).await;
    assert!(api.search_calls().is_empty());
    assert!(api.metrics_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_close_cancels_in_flight_query() {
    let (controller, api) = controller(
        FakeApi::server()
            .with_hits("slow", vec![hit("/slow", "Slow")])
            .with_delay("slow", Duration::from_millis(500)),
    );
    open_ready(&controller).await;

    controller.on_phrase_change("slow");
    wait_ms(300).await;
    assert_eq!(api.search_calls(), vec!["slow"]);

    controller.close();
    assert_eq!(controller.snapshot(), SessionState::default());

    wait_ms(3_000).await;
    assert_eq!(controller.snapshot(), SessionState::default());
    assert!(api.metrics_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_close_before_quiet_period_sends_nothing() {
    let (controller, api) = controller(FakeApi::server());
    open_ready(&controller).await;

    controller.on_phrase_change("rust");
    wait_ms(100).await;
    controller.close();

    wait_ms(2_000).await;
    assert!(api.search_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_close_mid_bootstrap_skips_bundle() {
    let (controller, api) = controller(
        FakeApi::client(bundle_json(sample_documents())).with_bootstrap_delay(Duration::from_secs(1)),
    );
    controller.open();
    wait_ms(100).await;
    controller.close();

    wait_ms(3_000).await;
    assert!(!api.calls().contains(&ApiCall::IndexBundle));
    assert_eq!(controller.snapshot(), SessionState::default());
}

#[tokio::test(start_paused = true)]
async fn test_close_mid_bootstrap_releases_parked_query() {
    let (controller, api) = controller(
        FakeApi::server()
            .with_bootstrap_delay(Duration::from_secs(1))
            .with_hits("rust", vec![hit("/rust", "Rust")]),
    );
    controller.open();
    controller.on_phrase_change("rust");

    // Past the quiet period: the query is waiting on the backend
    wait_ms(500).await;
    controller.close();
    drop(controller);

    wait_ms(60_000).await;
    assert!(api.search_calls().is_empty());
    assert_eq!(Arc::strong_count(&api), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reopen_after_close_mid_bootstrap() {
    let (controller, api) = controller(
        FakeApi::server()
            .with_bootstrap_delay(Duration::from_millis(300))
            .with_hits("rust", vec![hit("/rust", "Rust")]),
    );
    controller.open();
    controller.on_phrase_change("rust");
    wait_ms(100).await;
    controller.close();

    let state = open_ready(&controller).await;
    assert_eq!(state.phase(), SessionPhase::Ready(BackendMode::Remote));
    controller.on_phrase_change("rust");
    let state = controller.settled().await;
    assert_eq!(uris(&state), vec!["/rust"]);
    assert_eq!(api.search_calls(), vec!["rust"]);
}

#[tokio::test(start_paused = true)]
async fn test_phrase_change_while_closed_is_ignored() {
    let (controller, api) = controller(FakeApi::server());
    controller.on_phrase_change("rust");
    wait_ms(1_000).await;

    assert_eq!(controller.snapshot(), SessionState::default());
    assert!(api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reopen_bootstraps_again() {
    let (controller, api) = controller(FakeApi::server());
    let first = open_ready(&controller).await;
    controller.close();
    let second = open_ready(&controller).await;

    assert!(second.epoch > first.epoch);
    let configs = api
        .calls()
        .into_iter()
        .filter(|c| *c == ApiCall::Config)
        .count();
    assert_eq!(configs, 2);
}

#[tokio::test(start_paused = true)]
async fn test_double_open_is_noop() {
    let (controller, api) = controller(FakeApi::server());
    let first = open_ready(&controller).await;
    controller.open();
    wait_ms(100).await;

    assert_eq!(controller.snapshot().epoch, first.epoch);
    assert_eq!(
        api.calls().iter().filter(|c| **c == ApiCall::Config).count(),
        1
    );
}
