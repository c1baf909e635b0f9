/// Integration tests for the write path against an HTTP store double.
use call_ledger::{
    config::{StoreAccess, StoreCredentials},
    models::CallRecord,
    retry::RetryPolicy,
    writer::{LogWriter, SaveOutcome},
};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;

fn access_for(server: &MockServer) -> StoreAccess {
    StoreAccess::Configured(StoreCredentials {
        url: server.base_url(),
        api_key: "test-key".to_string(),
        table: "call_logs".to_string(),
        timeout_seconds: 5,
    })
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        delays: vec![Duration::from_millis(1); 3],
    }
}

fn test_record() -> CallRecord {
    let mut record = CallRecord::new("+15551234567", 92, "Hello, am I speaking with Dana?");
    record.summary = "Booking Confirmed for Tuesday 2pm".to_string();
    record.was_booked = true;
    record
}

const PGRST204_BODY: &str = r#"{"code":"PGRST204","message":"Could not find the 'sentiment' column of 'call_logs' in the schema cache","details":null,"hint":null}"#;

#[tokio::test]
async fn test_save_succeeds_on_first_attempt() {
    let server = MockServer::start_async().await;
    let insert = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/call_logs")
                .header("apikey", "test-key")
                .header("Prefer", "return=representation");
            then.status(201)
                .header("content-type", "application/json")
                .json_body(json!([{"id": 1, "phone_number": "+15551234567"}]));
        })
        .await;

    let writer = LogWriter::with_policy(access_for(&server), fast_policy());
    let outcome = writer.save(&test_record()).await;

    assert!(outcome.success());
    insert.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_schema_mismatch_falls_back_to_base_columns() {
    let server = MockServer::start_async().await;

    // The unmigrated store rejects payloads carrying analytics columns...
    let full_insert = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/call_logs")
                .body_includes("sentiment");
            then.status(400)
                .header("content-type", "application/json")
                .body(PGRST204_BODY);
        })
        .await;
    // ...and accepts base-column payloads.
    let base_insert = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/call_logs")
                .body_excludes("sentiment");
            then.status(201)
                .header("content-type", "application/json")
                .json_body(json!([{"id": 2, "phone_number": "+15551234567"}]));
        })
        .await;

    let writer = LogWriter::with_policy(access_for(&server), fast_policy());
    let outcome = writer.save(&test_record()).await;

    assert!(outcome.success());
    // Exactly 2 insert invocations: one full attempt, one base fallback.
    full_insert.assert_hits_async(1).await;
    base_insert.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_transient_failures_exhaust_after_three_attempts() {
    let server = MockServer::start_async().await;
    let insert = server
        .mock_async(|when, then| {
            when.method(POST).path("/rest/v1/call_logs");
            then.status(503).body("service unavailable");
        })
        .await;

    let writer = LogWriter::with_policy(access_for(&server), fast_policy());
    let outcome = writer.save(&test_record()).await;

    assert!(!outcome.success());
    match outcome {
        SaveOutcome::Failed(detail) => assert!(detail.contains("max retries exceeded")),
        other => panic!("expected Failed, got {other:?}"),
    }
    insert.assert_hits_async(3).await;
}

#[tokio::test]
async fn test_permanent_failure_is_not_retried() {
    let server = MockServer::start_async().await;
    let insert = server
        .mock_async(|when, then| {
            when.method(POST).path("/rest/v1/call_logs");
            then.status(401).body(r#"{"message":"Invalid API key"}"#);
        })
        .await;

    let writer = LogWriter::with_policy(access_for(&server), fast_policy());
    let outcome = writer.save(&test_record()).await;

    assert!(!outcome.success());
    match outcome {
        SaveOutcome::Failed(detail) => assert!(detail.contains("Invalid API key")),
        other => panic!("expected Failed, got {other:?}"),
    }
    insert.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_schema_mismatch_on_base_attempt_fails_loudly() {
    // The store rejects everything with PGRST204, e.g. a wrong table name.
    let server = MockServer::start_async().await;
    let insert = server
        .mock_async(|when, then| {
            when.method(POST).path("/rest/v1/call_logs");
            then.status(400)
                .header("content-type", "application/json")
                .body(PGRST204_BODY);
        })
        .await;

    let writer = LogWriter::with_policy(access_for(&server), fast_policy());
    let outcome = writer.save(&test_record()).await;

    assert!(!outcome.success());
    match outcome {
        SaveOutcome::Failed(detail) => assert!(detail.contains("base columns rejected")),
        other => panic!("expected Failed, got {other:?}"),
    }
    // One full attempt plus one fallback attempt, neither retried.
    insert.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_unconfigured_save_makes_no_network_call() {
    let server = MockServer::start_async().await;
    // Spy: any request at all would be counted here.
    let spy = server
        .mock_async(|when, then| {
            when.path_includes("/");
            then.status(201).json_body(json!([]));
        })
        .await;

    let writer = LogWriter::new(StoreAccess::Unconfigured);
    let outcome = writer.save(&test_record()).await;

    assert!(!outcome.success());
    assert!(matches!(outcome, SaveOutcome::Skipped(_)));
    spy.assert_hits_async(0).await;
}
