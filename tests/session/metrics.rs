//! Usage beacon timing relative to settled results.

use super::common::*;
use sitesearch::config::SessionOptions;
use sitesearch::testing::FakeApi;
use std::time::Duration;

fn two_hits() -> FakeApi {
    FakeApi::server()
        .with_hits("rust", vec![hit("/a", "A"), hit("/b", "B")])
        .with_hits("rusty", vec![])
}

#[tokio::test(start_paused = true)]
async fn test_beacon_one_second_after_settle() {
    let (controller, api) = controller(two_hits());
    open_ready(&controller).await;

    controller.on_phrase_change("rust");
    controller.settled().await;

    wait_ms(999).await;
    assert!(api.metrics_calls().is_empty());
    wait_ms(2).await;
    assert_eq!(api.metrics_calls(), vec![("rust".to_string(), 2)]);
}

#[tokio::test(start_paused = true)]
async fn test_new_phrase_cancels_pending_beacon() {
    let (controller, api) = controller(two_hits());
    open_ready(&controller).await;

    controller.on_phrase_change("rust");
    controller.settled().await;
    wait_ms(500).await;
    controller.on_phrase_change("rusty");
    controller.settled().await;

    wait_ms(3_000).await;
    assert_eq!(api.metrics_calls(), vec![("rusty".to_string(), 0)]);
}

#[tokio::test(start_paused = true)]
async fn test_clearing_phrase_cancels_beacon() {
    let (controller, api) = controller(two_hits());
    open_ready(&controller).await;

    controller.on_phrase_change("rust");
    controller.settled().await;
    controller.on_phrase_change("");

    wait_ms(3_000).await;
    assert!(api.metrics_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_close_cancels_beacon() {
    let (controller, api) = controller(two_hits());
    open_ready(&controller).await;

    controller.on_phrase_change("rust");
    controller.settled().await;
    controller.close();

    wait_ms(3_000).await;
    assert!(api.metrics_calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_custom_delays() {
    let options = SessionOptions {
        debounce: Duration::from_millis(50),
        metrics_delay: Duration::from_millis(200),
        ..SessionOptions::default()
    };
    let (controller, api) = controller_with(two_hits(), options);
    open_ready(&controller).await;

    controller.on_phrase_change("rust");
    wait_ms(60).await;
    assert_eq!(api.search_calls(), vec!["rust"]);

    wait_ms(200).await;
    assert_eq!(api.metrics_calls(), vec![("rust".to_string(), 2)]);
}
