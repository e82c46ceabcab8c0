use super::*;
use std::time::Duration;

use serde_json::json;

use crate::backend::test_helpers::MockApi;
use crate::error::ConsoleError;
use crate::regions::{DisplayRegion, Explanation, SourceColumns, USER_COUNT_FAILED};
use crate::ticker::PROGRESS_MESSAGES;

const TABLE: &str = "proj.ds.events";

fn orchestrator(api: Arc<MockApi>) -> GenerationOrchestrator {
    let page = Page::new(TABLE);
    let ticker = ProgressTicker::new(page.clone(), Duration::from_secs(3));
    GenerationOrchestrator::new(api, page, ticker)
}

fn success_payload() -> serde_json::Value {
    json!({
        "success": true,
        "attribute_name": "Frequent Buyers",
        "attribute_description": "Three or more orders in 30 days.",
        "filter_clause": "orders_30d >= 3",
        "columns_used": ["orders_30d", "user_id"],
        "matching_users": 42
    })
}

// =========================================================================
// empty input
// =========================================================================

#[tokio::test]
async fn whitespace_input_issues_no_request_and_changes_nothing() {
    let api = Arc::new(MockApi::new());
    let orch = orchestrator(api.clone());
    orch.page().update(|state| state.regions.query_text.0 = "previous".into());
    let before = orch.page().snapshot();

    assert_eq!(orch.submit_goal("").await, SubmitOutcome::Ignored);
    assert_eq!(orch.submit_goal("   \n\t").await, SubmitOutcome::Ignored);

    assert_eq!(api.calls(), 0);
    assert_eq!(orch.page().snapshot(), before);
}

// =========================================================================
// success
// =========================================================================

#[tokio::test]
async fn success_populates_every_region_and_reveals_feedback() {
    let api = Arc::new(MockApi::new());
    api.push_generate_json(success_payload());
    let orch = orchestrator(api.clone());
    orch.page().update(|state| state.feedback_message = "Thanks for providing your feedback!".into());

    assert_eq!(orch.submit_goal("  frequent buyers ").await, SubmitOutcome::Generated);

    let page = orch.page().snapshot();
    assert_eq!(api.calls(), 1);
    assert!(!page.loading);
    assert!(page.feedback_controls_visible);
    assert!(page.feedback_message.is_empty());
    assert_eq!(
        page.regions.explanation,
        Explanation::Attribute {
            name: "Frequent Buyers".into(),
            description: "Three or more orders in 30 days.".into()
        }
    );
    assert_eq!(page.regions.query_text.text(), "orders_30d >= 3");
    assert_eq!(page.regions.row_count.text(), "The number of users in the audience is 42.");
    assert_eq!(page.regions.source_columns.items(), ["orders_30d", "user_id"]);
    assert!(page.ticker_owner.is_none());
}

#[tokio::test]
async fn success_replaces_last_generation() {
    let api = Arc::new(MockApi::new());
    api.push_generate_json(success_payload());
    api.push_generate_json(json!({ "success": true, "filter_clause": "x = 1" }));
    let orch = orchestrator(api);

    orch.submit_goal("frequent buyers").await;
    orch.submit_goal("x users").await;

    assert_eq!(
        orch.last_generation(),
        LastGeneration { attribute_goal: "x users".into(), filter_clause: "x = 1".into(), columns_used: vec![] }
    );
}

#[tokio::test]
async fn matching_users_sentinel_renders_failure_message() {
    let api = Arc::new(MockApi::new());
    api.push_generate_json(json!({ "success": true, "matching_users": "null", "columns_used": [] }));
    let orch = orchestrator(api);

    orch.submit_goal("anyone").await;

    let page = orch.page().snapshot();
    assert_eq!(page.regions.row_count.text(), USER_COUNT_FAILED);
    assert_eq!(page.regions.source_columns.view, SourceColumns::NoColumns);
}

// =========================================================================
// in-flight state
// =========================================================================

#[tokio::test]
async fn page_is_reset_and_loading_while_request_is_outstanding() {
    let api = Arc::new(MockApi::gated());
    api.push_generate_json(success_payload());
    let orch = Arc::new(orchestrator(api.clone()));
    orch.page().update(|state| {
        state.regions.query_text.0 = "stale".into();
        state.regions.explanation.show_error("stale");
        state.feedback_controls_visible = true;
    });

    let task = tokio::spawn({
        let orch = orch.clone();
        async move { orch.submit_goal("frequent buyers").await }
    });
    api.entered().await;

    let during = orch.page().snapshot();
    assert!(during.loading);
    assert!(!during.feedback_controls_visible);
    assert!(during.regions.query_text.text().is_empty());
    assert_eq!(during.regions.explanation, Explanation::Empty);
    assert_eq!(during.regions.source_columns.view, SourceColumns::Placeholder);
    assert_eq!(during.progress_message.as_deref(), Some(PROGRESS_MESSAGES[0]));
    assert!(orch.is_in_flight());

    api.release();
    assert_eq!(task.await.unwrap(), SubmitOutcome::Generated);
    assert!(!orch.page().snapshot().loading);
    assert!(!orch.is_in_flight());
}

#[tokio::test]
async fn overlapping_submission_is_rejected() {
    let api = Arc::new(MockApi::gated());
    api.push_generate_json(success_payload());
    let orch = Arc::new(orchestrator(api.clone()));

    let first = tokio::spawn({
        let orch = orch.clone();
        async move { orch.submit_goal("first goal").await }
    });
    api.entered().await;
    let during = orch.page().snapshot();

    assert_eq!(orch.submit_goal("second goal").await, SubmitOutcome::Busy);
    assert_eq!(api.calls(), 1);
    assert_eq!(orch.page().snapshot(), during);

    api.release();
    assert_eq!(first.await.unwrap(), SubmitOutcome::Generated);
    assert_eq!(orch.last_generation().attribute_goal, "first goal");
}

#[tokio::test(start_paused = true)]
async fn ticker_is_frozen_once_request_settles() {
    let api = Arc::new(MockApi::delayed(Duration::from_millis(4500)));
    let orch = orchestrator(api);

    orch.submit_goal("slow goal").await;
    let settled = orch.page().snapshot().progress_message;
    assert_eq!(settled.as_deref(), Some(PROGRESS_MESSAGES[1]));

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(orch.page().snapshot().progress_message, settled);
}

// =========================================================================
// declared failure
// =========================================================================

#[tokio::test]
async fn declared_failure_shows_error_and_keeps_previous_last_generation() {
    let api = Arc::new(MockApi::new());
    api.push_generate_json(success_payload());
    api.push_generate_json(json!({ "success": false, "error": "bad input" }));
    let orch = orchestrator(api.clone());

    orch.submit_goal("frequent buyers").await;
    let outcome = orch.submit_goal("???").await;

    assert_eq!(outcome, SubmitOutcome::Declined { error: "bad input".into() });
    let page = orch.page().snapshot();
    assert_eq!(page.regions.explanation.text(), "Error: bad input");
    assert!(page.feedback_controls_visible);
    assert!(!page.loading);
    assert!(page.regions.query_text.text().is_empty());
    assert_eq!(orch.last_generation().attribute_goal, "frequent buyers");
    assert_eq!(api.calls(), 2);
}

#[tokio::test]
async fn declared_failure_without_error_uses_fallback() {
    let api = Arc::new(MockApi::new());
    api.push_generate_json(json!({ "success": false }));
    let orch = orchestrator(api);

    let outcome = orch.submit_goal("goal").await;

    assert_eq!(outcome, SubmitOutcome::Declined { error: GENERATION_FAILED.into() });
    assert_eq!(orch.last_generation(), LastGeneration::default());
}

// =========================================================================
// transport failure
// =========================================================================

#[tokio::test]
async fn transport_failure_shows_error_and_keeps_feedback_hidden() {
    let api = Arc::new(MockApi::new());
    api.push_generate(Err(ConsoleError::Request("connection refused".into())));
    let orch = orchestrator(api.clone());
    orch.page().update(|state| state.feedback_controls_visible = true);

    let outcome = orch.submit_goal("goal").await;

    assert_eq!(outcome, SubmitOutcome::Failed { error: "request failed: connection refused".into() });
    let page = orch.page().snapshot();
    assert_eq!(page.regions.explanation.text(), "Error: request failed: connection refused");
    assert!(!page.feedback_controls_visible);
    assert!(!page.loading);
    assert_eq!(page.regions.source_columns.view, SourceColumns::Placeholder);
    assert!(page.regions.row_count.text().is_empty());
    assert_eq!(api.calls(), 1);
    assert!(!orch.is_in_flight());
}

#[tokio::test]
async fn resubmission_after_failure_is_accepted() {
    let api = Arc::new(MockApi::new());
    api.push_generate(Err(ConsoleError::Parse("expected value".into())));
    api.push_generate_json(success_payload());
    let orch = orchestrator(api.clone());

    assert!(matches!(orch.submit_goal("goal").await, SubmitOutcome::Failed { .. }));
    assert_eq!(orch.submit_goal("goal").await, SubmitOutcome::Generated);
    assert_eq!(api.calls(), 2);
}
