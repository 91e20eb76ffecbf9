//! Progressive batch delivery behavior.

mod test_utils;

use examforge::{
    FetchTarget, Orchestrator, PracticePlan, ProgressiveFetcher, ProviderKind, RateLimitConfig,
};
use examforge_error::ProviderErrorKind;
use std::sync::Arc;
use test_utils::{approved_question, mcq_array_json, MockDriver};
use tokio::sync::Notify;

fn no_spacing() -> RateLimitConfig {
    RateLimitConfig {
        min_interval_ms: 0,
        cooldown_secs: 45,
    }
}

fn plan(target: FetchTarget) -> PracticePlan {
    PracticePlan::builder()
        .exam("SSC CGL".to_string())
        .subject("General Awareness".to_string())
        .target(target)
        .build()
        .unwrap()
}

fn fetcher_with(driver: Arc<MockDriver>) -> ProgressiveFetcher {
    let orchestrator = Orchestrator::builder()
        .with_driver(ProviderKind::Primary, driver, no_spacing())
        .build();
    ProgressiveFetcher::new(Arc::new(orchestrator))
}

#[tokio::test(start_paused = true)]
async fn deduplicates_repeats_across_batches() {
    let driver = Arc::new(MockDriver::new("primary"));
    driver.push_ok(mcq_array_json(&["A1", "A2", "A3", "A4", "A5"]));
    driver.push_ok(mcq_array_json(&["B1", "B2", "B3", "A1", "A2"]));
    driver.push_ok(mcq_array_json(&["C1", "C2"]));
    let fetcher = fetcher_with(driver.clone());

    let session = fetcher.start_session(plan(FetchTarget::Count(10)));
    fetcher.fill(session).await;

    assert_eq!(fetcher.delivered(), 10);
    assert_eq!(driver.calls(), 3, "two repeats cost one extra round");
    assert!(!fetcher.is_fetching());

    let ids: Vec<String> = fetcher.items().into_iter().map(|q| q.id).collect();
    let unique: std::collections::HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "no duplicate ids delivered");
}

#[tokio::test(start_paused = true)]
async fn counted_session_stops_exactly_at_target() {
    let driver = Arc::new(MockDriver::new("primary"));
    driver.push_ok(mcq_array_json(&["A1", "A2", "A3", "A4", "A5"]));
    driver.push_ok(mcq_array_json(&["B1", "B2", "B3", "B4", "B5"]));
    let fetcher = fetcher_with(driver.clone());

    let session = fetcher.start_session(plan(FetchTarget::Count(10)));
    fetcher.fill(session).await;

    assert_eq!(fetcher.delivered(), 10);
    assert_eq!(driver.calls(), 2, "all-unique batches need ceil(10/5) rounds");
    assert!(!fetcher.is_fetching());
}

#[tokio::test(start_paused = true)]
async fn final_round_asks_only_for_the_shortfall() {
    let driver = Arc::new(MockDriver::new("primary"));
    driver.push_ok(mcq_array_json(&["A1", "A2", "A3"]));
    let fetcher = fetcher_with(driver.clone());

    let session = fetcher.start_session(plan(FetchTarget::Count(3)));
    fetcher.fill(session).await;

    assert_eq!(fetcher.delivered(), 3);
    assert_eq!(driver.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_batch_stops_but_keeps_delivered_items() {
    let driver = Arc::new(MockDriver::new("primary"));
    driver.push_ok(mcq_array_json(&["A1", "A2", "A3", "A4", "A5"]));
    driver.push_err(ProviderErrorKind::Http("connection reset".to_string()));
    let fetcher = fetcher_with(driver.clone());

    let session = fetcher.start_session(plan(FetchTarget::Count(10)));
    fetcher.fill(session).await;

    assert_eq!(fetcher.delivered(), 5, "first batch survives the failure");
    assert!(!fetcher.is_fetching(), "flag must clear on the failure path");
}

#[tokio::test(start_paused = true)]
async fn all_repeat_batch_ends_the_session() {
    let driver = Arc::new(MockDriver::new("primary"));
    driver.push_ok(mcq_array_json(&["A1", "A2", "A3", "A4", "A5"]));
    driver.push_ok(mcq_array_json(&["A1", "A2", "A3", "A4", "A5"]));
    let fetcher = fetcher_with(driver.clone());

    let session = fetcher.start_session(plan(FetchTarget::Count(10)));
    fetcher.fill(session).await;

    assert_eq!(fetcher.delivered(), 5);
    assert_eq!(driver.calls(), 2, "a zero-new round must not loop forever");
    assert!(!fetcher.is_fetching());
}

#[tokio::test(start_paused = true)]
async fn seeded_items_count_toward_the_target() {
    let driver = Arc::new(MockDriver::new("primary"));
    driver.push_ok(mcq_array_json(&["G1", "G2"]));
    let fetcher = fetcher_with(driver.clone());

    let session = fetcher.start_session(plan(FetchTarget::Count(4)));
    fetcher.seed_items(
        session,
        vec![
            approved_question("appr-1", "Seeded one"),
            approved_question("appr-2", "Seeded two"),
        ],
    );
    fetcher.fill(session).await;

    assert_eq!(fetcher.delivered(), 4);
    assert_eq!(driver.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn endless_session_fetches_one_round_per_nudge() {
    let driver = Arc::new(MockDriver::new("primary"));
    driver.push_ok(mcq_array_json(&["A1", "A2", "A3", "A4", "A5"]));
    driver.push_ok(mcq_array_json(&["B1", "B2", "B3", "B4", "B5"]));
    let fetcher = fetcher_with(driver.clone());

    let session = fetcher.start_session(plan(FetchTarget::Endless));
    fetcher.fill(session).await;
    assert_eq!(fetcher.delivered(), 5);
    assert_eq!(driver.calls(), 1);

    fetcher.notify_near_tail(session).await;
    assert_eq!(fetcher.delivered(), 10);
    assert_eq!(driver.calls(), 2);
    assert!(!fetcher.is_fetching());
}

#[tokio::test(start_paused = true)]
async fn replaced_session_discards_in_flight_results() {
    let gate = Arc::new(Notify::new());
    let driver = Arc::new(MockDriver::gated("primary", gate.clone()));
    driver.push_ok(mcq_array_json(&["A1", "A2", "A3", "A4", "A5"]));
    let fetcher = Arc::new(fetcher_with(driver.clone()));

    let first = fetcher.start_session(plan(FetchTarget::Count(5)));
    let filling = {
        let fetcher = Arc::clone(&fetcher);
        tokio::spawn(async move { fetcher.fill(first).await })
    };

    // Let the fill round reach the provider, which parks at the gate.
    tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    assert_eq!(driver.calls(), 1);
    assert!(fetcher.is_fetching());

    let _second = fetcher.start_session(plan(FetchTarget::Count(5)));
    gate.notify_one();
    filling.await.unwrap();

    assert_eq!(fetcher.delivered(), 0, "stale batch must not leak into the new session");
    assert!(!fetcher.is_fetching());
}

#[tokio::test(start_paused = true)]
async fn concurrent_fill_calls_run_one_loop() {
    let gate = Arc::new(Notify::new());
    let driver = Arc::new(MockDriver::gated("primary", gate.clone()));
    driver.push_ok(mcq_array_json(&["A1", "A2", "A3", "A4", "A5"]));
    let fetcher = Arc::new(fetcher_with(driver.clone()));

    let session = fetcher.start_session(plan(FetchTarget::Count(5)));
    let filling = {
        let fetcher = Arc::clone(&fetcher);
        tokio::spawn(async move { fetcher.fill(session).await })
    };
    tokio::time::sleep(std::time::Duration::from_millis(1)).await;

    // Second entry bails out immediately while the first is parked.
    fetcher.fill(session).await;
    assert_eq!(driver.calls(), 1);

    gate.notify_one();
    filling.await.unwrap();
    assert_eq!(fetcher.delivered(), 5);
}
