//! Tests for the meetings module

use super::*;
use crate::auth::{AuthConfig, Credentials};
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::{Duration, Instant};
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn meetings_client(server: &MockServer) -> MeetingsClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .user_agent("curl/8.0")
        .build();
    let client =
        HttpClient::with_auth(config, AuthConfig::bearer(Credentials::new("mg-token"))).unwrap();
    MeetingsClient::new(client, "1843")
}

fn record(value: serde_json::Value) -> Record {
    value.as_object().unwrap().clone()
}

// ============================================================================
// Date helpers
// ============================================================================

#[test_case("2025-02-03" ; "plain date")]
#[test_case("2024-02-29" ; "leap day")]
fn test_parse_date_filter_ok(input: &str) {
    let date = parse_date_filter(input).unwrap();
    assert_eq!(date.format("%Y-%m-%d").to_string(), input);
}

#[test_case("2025-2-3" ; "short fields")]
#[test_case("03-02-2025" ; "day first")]
#[test_case("2025-02-03T00:00" ; "with time")]
#[test_case("2025-13-01" ; "month out of range")]
#[test_case("2023-02-29" ; "not a leap year")]
fn test_parse_date_filter_rejects(input: &str) {
    assert!(matches!(parse_date_filter(input), Err(Error::Config { .. })));
}

#[test]
fn test_meeting_date() {
    let m = record(json!({"timestamp_start_utc": "2025-02-03T14:00:00Z"}));
    assert_eq!(meeting_date(&m), Some("2025-02-03"));

    let m = record(json!({"timestamp_start_utc": "2025-02-03 14:00:00"}));
    assert_eq!(meeting_date(&m), Some("2025-02-03"));

    let m = record(json!({"timestamp_start_utc": "2025"}));
    assert_eq!(meeting_date(&m), None);

    let m = record(json!({"timestamp_start_utc": null}));
    assert_eq!(meeting_date(&m), None);

    assert_eq!(meeting_date(&record(json!({}))), None);
}

#[test]
fn test_filter_by_date() {
    let meetings = vec![
        record(json!({"meeting_id": "a", "timestamp_start_utc": "2025-02-03T09:00:00Z"})),
        record(json!({"meeting_id": "b", "timestamp_start_utc": "2025-02-04T09:00:00Z"})),
        record(json!({"meeting_id": "c"})),
        record(json!({"meeting_id": "d", "timestamp_start_utc": "2025-02-03T23:59:59Z"})),
    ];
    let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();

    let ids: Vec<String> = filter_by_date(meetings, date)
        .iter()
        .map(|m| m["meeting_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["a", "d"]);
}

#[test]
fn test_summary_line() {
    let details = MeetingDetails {
        meeting_id: "m-1".to_string(),
        title: "Weekly sync".to_string(),
        source: "zoom".to_string(),
        timestamp_start_utc: "2025-02-03T14:00:00Z".to_string(),
        join_link: None,
        participant_emails: vec!["a@x.io".to_string(), "b@x.io".to_string()],
    };
    assert_eq!(
        details.summary(),
        "Weekly sync, m-1, zoom, 2025-02-03T14:00:00Z, a@x.io and b@x.io"
    );
}

// ============================================================================
// MeetingsClient
// ============================================================================

#[tokio::test]
async fn test_list_meetings_follows_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teams/1843/meetings"))
        .and(query_param("cursor", "c+/2=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meetings": [{"meeting_id": "m-3"}],
            "pagination": {"next_cursor": null}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/teams/1843/meetings"))
        .and(query_param("limit", "500"))
        .and(header("Authorization", "Bearer mg-token"))
        .and(header("User-Agent", "curl/8.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meetings": [{"meeting_id": "m-1"}, {"meeting_id": "m-2"}],
            "pagination": {"next_cursor": "c+/2=="}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = meetings_client(&server);
    let meetings = client.list_meetings().await.unwrap();

    let ids: Vec<&str> = meetings
        .iter()
        .map(|m| m["meeting_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["m-1", "m-2", "m-3"]);
}

#[tokio::test]
async fn test_get_meeting() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meetings/m-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meeting_id": "m-1",
            "title": "Kickoff",
            "source": "google_meet",
            "timestamp_start_utc": "2025-02-03T14:00:00Z",
            "join_link": "https://meet.example/abc",
            "participant_emails": ["a@x.io"]
        })))
        .mount(&server)
        .await;

    let client = meetings_client(&server);
    let details = client.get_meeting("m-1").await.unwrap();

    assert_eq!(details.title, "Kickoff");
    assert_eq!(details.join_link.as_deref(), Some("https://meet.example/abc"));
    assert_eq!(details.participant_emails, vec!["a@x.io".to_string()]);
}

#[tokio::test]
async fn test_get_meeting_fills_missing_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meetings/m-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Solo"})))
        .mount(&server)
        .await;

    let details = meetings_client(&server).get_meeting("m-9").await.unwrap();
    assert_eq!(details.meeting_id, "m-9");
    assert_eq!(details.summary(), "Solo, m-9, , , ");
}

// ============================================================================
// WebhookNotifier
// ============================================================================

#[test]
fn test_webhook_url_for() {
    let notifier =
        WebhookNotifier::new("https://hooks.example/webhook/supa-from-id", Duration::from_secs(8))
            .unwrap();
    assert_eq!(
        notifier.url_for("m 1&x").as_str(),
        "https://hooks.example/webhook/supa-from-id?id=m+1%26x"
    );
    assert_eq!(notifier.interval(), DEFAULT_WEBHOOK_INTERVAL);
}

#[test]
fn test_webhook_invalid_url() {
    let err = WebhookNotifier::new("not a url", DEFAULT_WEBHOOK_INTERVAL).unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

#[tokio::test]
async fn test_webhook_calls_are_paced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;

    let interval = Duration::from_millis(150);
    let notifier = WebhookNotifier::new(&format!("{}/hook", server.uri()), interval).unwrap();

    let start = Instant::now();
    for id in ["a", "b", "c"] {
        assert_eq!(notifier.notify(id).await.unwrap(), 200);
    }

    assert!(start.elapsed() >= interval);
    let received = server.received_requests().await.unwrap();
    let queries: Vec<&str> = received.iter().filter_map(|r| r.url.query()).collect();
    assert_eq!(queries, vec!["id=a", "id=b", "id=c"]);
}

#[tokio::test]
async fn test_notify_meetings_continues_after_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meetings/m-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meeting_id": "m-1",
            "title": "One",
            "source": "zoom",
            "timestamp_start_utc": "2025-02-03T14:00:00Z",
            "participant_emails": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/meetings/m-2"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such meeting"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/meetings/m-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "Three"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hook"))
        .and(query_param("id", "m-3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("workflow crashed"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = meetings_client(&server);
    let notifier =
        WebhookNotifier::new(&format!("{}/hook", server.uri()), Duration::from_millis(1)).unwrap();
    let meetings = vec![
        record(json!({"meeting_id": "m-1"})),
        record(json!({"meeting_id": "m-2"})),
        record(json!({"meeting_id": "m-3"})),
    ];

    let outcomes = notify_meetings(&client, &notifier, &meetings).await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes[0],
        MeetingOutcome::Notified {
            meeting_id: "m-1".to_string(),
            status: 200,
            summary: "One, m-1, zoom, 2025-02-03T14:00:00Z, ".to_string(),
        }
    );
    assert!(!outcomes[1].is_notified());
    assert!(outcomes[1].to_string().starts_with("m-2 error: Remote API error 404"));
    assert!(outcomes[2].to_string().contains("workflow crashed"));
}
