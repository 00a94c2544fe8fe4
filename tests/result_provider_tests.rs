//! HTTP result adapter tests against local fake upstreams.

mod common;

use bteb_results::cache::ResultCache;
use bteb_results::error::BtebError;
use bteb_results::regulation::Regulation;
use bteb_results::result::{
    semester_gpas, CachedResultProvider, HttpResultProvider, ResultProvider, ResultQuery,
};
use bteb_results::test_utils::assertions::assert_error_contains;
use bteb_results::test_utils::fixtures::{NOT_FOUND_JSON, SAMPLE_RESULT_JSON};
use common::{
    start_corrupt_server, start_hanging_server, start_json_server, start_refusing_server,
    start_streaming_server,
};
use serial_test::serial;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn provider(endpoint: &str, timeout_secs: u64) -> HttpResultProvider {
    HttpResultProvider::new(endpoint, Duration::from_secs(timeout_secs), "bteb-results-tests")
        .unwrap()
}

fn query(roll: &str) -> ResultQuery {
    ResultQuery::new(roll, Regulation::R2022, "Diploma in Engineering").unwrap()
}

#[test]
#[serial]
fn test_fetch_success_sends_expected_query() {
    let (endpoint, log) = start_json_server(200, SAMPLE_RESULT_JSON);
    let result = provider(&endpoint, 5).fetch(&query("123456")).unwrap();

    assert_eq!(result.roll, 123456);
    assert_eq!(
        semester_gpas(&result)[..3],
        [Some(3.5), Some(3.75), None]
    );

    let requests = log.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET /api/data-fetch?"));
    assert!(requests[0].contains("studentId=123456"));
    assert!(requests[0].contains("regulation=2022"));
    assert!(requests[0].contains("program=Diploma+in+Engineering"));
}

#[test]
#[serial]
fn test_fetch_envelope() {
    let body = format!(r#"{{"data": {SAMPLE_RESULT_JSON}}}"#);
    let (endpoint, _) = start_json_server(200, &body);
    let result = provider(&endpoint, 5).fetch(&query("123456")).unwrap();
    assert_eq!(result.institute.code, 10053);
}

#[test]
#[serial]
fn test_fetch_not_found() {
    let (endpoint, _) = start_json_server(404, NOT_FOUND_JSON);
    let err = provider(&endpoint, 5).fetch(&query("111111")).unwrap_err();
    assert!(matches!(err, BtebError::ResultNotFound { .. }));

    let (endpoint, _) = start_json_server(200, NOT_FOUND_JSON);
    let err = provider(&endpoint, 5).fetch(&query("111111")).unwrap_err();
    assert_eq!(err.user_message(), "No result found for roll 111111");
}

#[test]
#[serial]
fn test_fetch_server_error_keeps_status() {
    let (endpoint, _) = start_json_server(500, r#"{"error": "Failed to fetch data"}"#);
    match provider(&endpoint, 5).fetch(&query("123456")) {
        Err(BtebError::Upstream { status, message }) => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "Failed to fetch data");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_fetch_malformed_body() {
    let (endpoint, _) = start_json_server(200, "<html>maintenance</html>");
    let err = provider(&endpoint, 5).fetch(&query("123456")).unwrap_err();
    assert!(err.user_message().starts_with("Malformed response"));
}

#[test]
#[serial]
fn test_fetch_oversized_body() {
    let huge = format!(r#"{{"padding": "{}"}}"#, "x".repeat(1024 * 1024 + 1));
    let (endpoint, _) = start_json_server(200, &huge);
    let err = provider(&endpoint, 5).fetch(&query("123456")).unwrap_err();
    assert!(matches!(err, BtebError::Upstream { .. }));
    assert_error_contains(&err, &["larger than"]);
}

#[test]
#[serial]
fn test_fetch_oversized_body_without_length() {
    let endpoint = start_streaming_server(8 * 1024 * 1024);
    let err = provider(&endpoint, 5).fetch(&query("123456")).unwrap_err();
    assert_error_contains(&err, &["larger than"]);
}

#[test]
#[serial]
fn test_fetch_timeout() {
    let endpoint = start_hanging_server();
    let started = Instant::now();
    let err = provider(&endpoint, 1).fetch(&query("123456")).unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_error_contains(&err, &["Result service error"]);
    match err {
        BtebError::Upstream { status, .. } => assert_eq!(status, None),
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_fetch_connection_dropped() {
    let endpoint = start_refusing_server();
    let err = provider(&endpoint, 5).fetch(&query("123456")).unwrap_err();
    assert!(matches!(err, BtebError::Upstream { status: None, .. }));
}

#[test]
#[serial]
fn test_fetch_corrupt_response() {
    let endpoint = start_corrupt_server();
    assert!(provider(&endpoint, 5).fetch(&query("123456")).is_err());
}

#[test]
#[serial]
fn test_cached_provider_hits_upstream_once() {
    let temp_dir = TempDir::new().unwrap();
    let (endpoint, log) = start_json_server(200, SAMPLE_RESULT_JSON);
    let cached = CachedResultProvider::new(
        provider(&endpoint, 5),
        ResultCache::new(temp_dir.path(), Duration::from_secs(300)),
    );

    let first = cached.fetch(&query("123456")).unwrap();
    let second = cached.fetch(&query("123456")).unwrap();
    assert_eq!(first, second);
    assert_eq!(log.lock().unwrap().len(), 1);

    // A different regulation is a different query.
    let other = ResultQuery::new("123456", Regulation::R2016, "").unwrap();
    cached.fetch(&other).unwrap();
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn test_invalid_roll_rejected_before_io() {
    for roll in ["", "   ", "12a456", "-1", "1234567890123"] {
        let err = ResultQuery::new(roll, Regulation::R2022, "").unwrap_err();
        assert!(matches!(err, BtebError::InvalidRoll { .. }), "{roll:?}");
    }
    assert_eq!(
        ResultQuery::new("", Regulation::R2022, "")
            .unwrap_err()
            .user_message(),
        "Student ID is required"
    );
}
