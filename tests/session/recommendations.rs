//! Recommendations panel shown before anything is typed.

use super::common::*;
use sitesearch::testing::FakeApi;
use sitesearch::RecommendationStatus;

#[tokio::test(start_paused = true)]
async fn test_recommendations_loaded_on_open() {
    let (controller, api) = controller(
        FakeApi::server().with_recommendations(vec![hit("/start", "Getting started")]),
    );
    controller.open();
    assert_eq!(
        controller.snapshot().recommendations.status,
        RecommendationStatus::Loading
    );

    let state = recommendations_settled(&controller).await;
    assert_eq!(state.recommendations.status, RecommendationStatus::Done);
    assert_eq!(state.recommendations.results[0].uri, "/start");
    assert_eq!(state.recommendations.results[0].title, "Getting started");
    assert!(api.calls().contains(&ApiCall::Recommendations));
}

#[tokio::test(start_paused = true)]
async fn test_recommendations_failure_is_error_state() {
    let (controller, _api) = controller(FakeApi::server().failing_recommendations());
    controller.open();

    let state = recommendations_settled(&controller).await;
    assert_eq!(state.recommendations.status, RecommendationStatus::Error);
    assert!(state.recommendations.results.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_recommendations_reset_on_close() {
    let (controller, _api) =
        controller(FakeApi::server().with_recommendations(vec![hit("/start", "Start")]));
    controller.open();
    recommendations_settled(&controller).await;
    controller.close();

    assert_eq!(
        controller.snapshot().recommendations.status,
        RecommendationStatus::Loading
    );
    assert!(controller.snapshot().recommendations.results.is_empty());
}
