//! Tests for engine module

use super::*;
use crate::http::HttpClientConfig;
use crate::streams::{AttendanceInsightsStream, EmployeeStream, LeaveBalanceStream};
use crate::types::FixedClock;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PATH: &str = "/uas/v1/oauth2/client-token";
const LEAVE_PATH: &str = "/leave/v2/employee/years/2024/balance";
const ATTENDANCE_PATH: &str = "/attendance/v2/employee/insights";

fn tap_config(server: &MockServer, extra: Value) -> TapConfig {
    let mut value = json!({
        "api_username": "svc-user-1",
        "api_password": "hunter2",
        "greythr_domain": server.uri(),
        "api_url": server.uri(),
        "year": "2024"
    });
    if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
        base.extend(extra.clone());
    }
    TapConfig::from_value(value).unwrap()
}

fn engine(config: TapConfig) -> SyncEngine {
    let client = HttpClient::with_config(HttpClientConfig::from_tap_config(&config)).unwrap();
    SyncEngine::new(client, config, StateManager::in_memory())
        .with_clock(FixedClock(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()))
}

async fn mount_token(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})))
        .expect(times)
        .mount(server)
        .await;
}

fn leave_page(employee_id: i64, has_next: bool) -> Value {
    json!({
        "data": [{
            "employeeId": employee_id,
            "summaries": [{"leaveTypeCategory": 1, "balance": 10}]
        }],
        "pages": {"hasNext": has_next}
    })
}

fn records(messages: &[Message]) -> Vec<&crate::types::JsonObject> {
    messages
        .iter()
        .filter_map(|m| match m {
            Message::Record { record, .. } => Some(record),
            _ => None,
        })
        .collect()
}

// ============================================================================
// SyncConfig / SyncStats
// ============================================================================

#[test]
fn test_sync_config_default() {
    let config = SyncConfig::default();
    assert_eq!(config.max_pages, crate::config::DEFAULT_MAX_PAGES);
    assert_eq!(config.max_records, 0);
    assert!(!config.records_exhausted(1_000_000));
}

#[test]
fn test_sync_config_builder() {
    let config = SyncConfig::new().with_max_pages(3).with_max_records(10);
    assert_eq!(config.max_pages, 3);
    assert!(!config.records_exhausted(9));
    assert!(config.records_exhausted(10));
}

#[test]
fn test_sync_stats_counters() {
    let mut stats = SyncStats::new();
    stats.add_records(5);
    stats.add_page();
    stats.add_page();
    stats.add_stream();
    stats.set_duration(12);

    assert_eq!(
        stats,
        SyncStats {
            records_synced: 5,
            pages_fetched: 2,
            streams_synced: 1,
            duration_ms: 12,
        }
    );
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_three_pages_then_stop() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path(LEAVE_PATH))
        .and(query_param("size", "25"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leave_page(1, true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LEAVE_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leave_page(2, true)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LEAVE_PATH))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leave_page(3, false)))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = engine(tap_config(&server, json!({})));
    let mut sink: Vec<Message> = Vec::new();
    engine.sync_stream(&LeaveBalanceStream, &mut sink).await.unwrap();

    assert!(sink.first().unwrap().is_schema());
    assert!(sink.last().unwrap().is_state());

    let ids: Vec<_> = records(&sink).iter().map(|r| r["employeeId"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);

    assert_eq!(engine.stats().pages_fetched, 3);
    assert_eq!(engine.stats().records_synced, 3);
    assert_eq!(engine.stats().streams_synced, 1);
}

#[tokio::test]
async fn test_page_limit_exceeded() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path(LEAVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(leave_page(1, true)))
        .expect(2)
        .mount(&server)
        .await;

    let mut engine = engine(tap_config(&server, json!({"max_pages": 2})));
    let mut sink: Vec<Message> = Vec::new();
    let err = engine
        .sync_stream(&LeaveBalanceStream, &mut sink)
        .await
        .unwrap_err();

    match err {
        Error::PageLimitExceeded { stream, max_pages } => {
            assert_eq!(stream, "leave_balances");
            assert_eq!(max_pages, 2);
        }
        other => panic!("Expected PageLimitExceeded, got {other:?}"),
    }
    assert!(!sink.iter().any(Message::is_state));
}

#[tokio::test]
async fn test_last_allowed_page_without_next_is_fine() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path(LEAVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(leave_page(1, false)))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = engine(tap_config(&server, json!({"max_pages": 1})));
    let mut sink: Vec<Message> = Vec::new();
    engine.sync_stream(&LeaveBalanceStream, &mut sink).await.unwrap();
    assert_eq!(records(&sink).len(), 1);
}

#[tokio::test]
async fn test_max_records_stops_paging() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    let body = json!({
        "data": [{
            "employeeId": 1,
            "summaries": [
                {"leaveTypeCategory": 1}, {"leaveTypeCategory": 2},
                {"leaveTypeCategory": 3}, {"leaveTypeCategory": 4}
            ]
        }],
        "pages": {"hasNext": true}
    });
    Mock::given(method("GET"))
        .and(path(LEAVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = engine(tap_config(&server, json!({})))
        .with_config(SyncConfig::new().with_max_records(3));
    let mut sink: Vec<Message> = Vec::new();
    engine.sync_stream(&LeaveBalanceStream, &mut sink).await.unwrap();

    assert_eq!(records(&sink).len(), 3);
    assert_eq!(engine.stats().records_synced, 3);
    assert!(sink.last().unwrap().is_state());
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn test_data_requests_carry_auth_headers_and_dates() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    let config = tap_config(&server, json!({}));
    let domain = config.domain_host().to_string();

    Mock::given(method("GET"))
        .and(path(ATTENDANCE_PATH))
        .and(header("ACCESS-TOKEN", "tok"))
        .and(header("x-greythr-domain", domain.as_str()))
        .and(query_param("start", "2024-02-01"))
        .and(query_param("end", "2024-02-29"))
        .and(query_param("size", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"employee": 9, "insights": {"days": [{"type": "lateIn", "days": 2}]}}],
            "pages": {"hasNext": false}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = engine(config);
    let mut sink: Vec<Message> = Vec::new();
    engine
        .sync_stream(&AttendanceInsightsStream, &mut sink)
        .await
        .unwrap();

    let rows = records(&sink);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["day_lateIn"], 2);
    assert_eq!(rows[0]["average_inTime"], Value::Null);
}

#[tokio::test]
async fn test_auth_failure_aborts_before_any_get() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("nope"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leave_page(1, false)))
        .expect(0)
        .mount(&server)
        .await;

    let mut engine = engine(tap_config(&server, json!({})));
    let mut sink: Vec<Message> = Vec::new();
    let result = engine.sync_stream(&LeaveBalanceStream, &mut sink).await;

    assert!(matches!(result, Err(Error::Auth { .. })));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_http_error_mid_stream_aborts_without_state() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path(LEAVE_PATH))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(leave_page(1, true)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LEAVE_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = engine(tap_config(&server, json!({})));
    let mut sink: Vec<Message> = Vec::new();
    let result = engine.sync_stream(&LeaveBalanceStream, &mut sink).await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 502, .. })));
    assert_eq!(records(&sink).len(), 1);
    assert!(!sink.iter().any(Message::is_state));
}

// ============================================================================
// Multiple streams and state
// ============================================================================

#[tokio::test]
async fn test_sync_all_exchanges_token_per_stream() {
    let server = MockServer::start().await;
    mount_token(&server, 2).await;

    Mock::given(method("GET"))
        .and(path(LEAVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(leave_page(1, false)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(ATTENDANCE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"employee": 1}],
            "pages": {"hasNext": false}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = engine(tap_config(&server, json!({})));
    let mut sink: Vec<Message> = Vec::new();
    let stats = engine
        .sync_all(&crate::streams::enabled_streams(), &mut sink)
        .await
        .unwrap();

    assert_eq!(stats.streams_synced, 2);
    assert_eq!(stats.records_synced, 2);

    let order: Vec<_> = sink
        .iter()
        .filter(|m| m.is_schema())
        .filter_map(Message::stream)
        .collect();
    assert_eq!(order, vec!["leave_balances", "attendance_insights"]);
    assert_eq!(sink.iter().filter(|m| m.is_state()).count(), 2);
}

#[tokio::test]
async fn test_employee_bookmark_tracks_max_replication_value() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"employeeId": 1, "lastModified": "2024-02-10T09:00:00"},
                {"employeeId": 2, "lastModified": "2024-03-01T12:30:00"},
                {"employeeId": 3, "lastModified": null}
            ],
            "pages": {"hasNext": false}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut engine = engine(tap_config(&server, json!({})));
    let mut sink: Vec<Message> = Vec::new();
    engine.sync_stream(&EmployeeStream, &mut sink).await.unwrap();

    assert_eq!(
        engine.state().get_cursor("employees").await,
        Some("2024-03-01T12:30:00".to_string())
    );

    let Some(Message::State { value }) = sink.last() else {
        panic!("Expected trailing STATE");
    };
    assert_eq!(
        value["bookmarks"]["employees"],
        json!({
            "replication_key": "lastModified",
            "replication_key_value": "2024-03-01T12:30:00"
        })
    );

    let Some(Message::Schema { bookmark_properties, .. }) = sink.first() else {
        panic!("Expected leading SCHEMA");
    };
    assert_eq!(bookmark_properties, &vec!["lastModified".to_string()]);
}

#[tokio::test]
async fn test_full_table_stream_leaves_bookmarks_alone() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path(LEAVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(leave_page(1, false)))
        .mount(&server)
        .await;

    let mut engine = engine(tap_config(&server, json!({})));
    let mut sink: Vec<Message> = Vec::new();
    engine.sync_stream(&LeaveBalanceStream, &mut sink).await.unwrap();

    assert_eq!(
        sink.last(),
        Some(&Message::state(json!({"bookmarks": {}})))
    );
}
