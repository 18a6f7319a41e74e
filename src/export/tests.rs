//! Tests for the exporter

use super::*;
use crate::error::Error;
use crate::http::HttpClientConfig;
use crate::pagination::TokenCursor;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    HttpClient::with_config(config).unwrap()
}

fn small_pages() -> ExportConfig {
    ExportConfig {
        rest_path: "rest/v1".to_string(),
        page_size: 2,
    }
}

#[test]
fn test_export_config_default() {
    let config = ExportConfig::default();
    assert_eq!(config.rest_path, "rest/v1");
    assert_eq!(config.page_size, 1000);
}

#[tokio::test]
async fn test_export_all_writes_one_artifact_per_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/notes"))
        .and(header("Range", "0-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, {"id": 2}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/notes"))
        .and(header("Range", "2-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 3}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "u-1"}])))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let client = client_for(&server);
    let exporter = Exporter::new(&client, &store).with_config(small_pages());

    let written = exporter.export_all(&["notes", "profiles"]).await.unwrap();

    assert_eq!(written.len(), 2);
    assert_eq!(written["notes"].collection, "notes");
    assert_eq!(written["notes"].records, 3);
    assert_eq!(written["notes"].path, dir.path().join("notes.json"));
    assert_eq!(written["profiles"].records, 1);

    let notes = store.read("notes").await.unwrap();
    let ids: Vec<i64> = notes.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_export_stops_at_failing_collection_keeping_earlier() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/attendees"))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let client = client_for(&server);
    let exporter = Exporter::new(&client, &store).with_config(small_pages());

    let err = exporter
        .export_all(&["notes", "attendees", "profiles"])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RemoteApi { status: 403, .. }));
    assert!(store.exists("notes"));
    assert!(!store.exists("attendees"));
    assert!(!store.exists("profiles"));
}

#[tokio::test]
async fn test_export_failed_drain_keeps_previous_artifact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let previous = vec![json!({"id": 1}).as_object().unwrap().clone()];
    store.write("notes", &previous).await.unwrap();

    let client = client_for(&server);
    let exporter = Exporter::new(&client, &store).with_config(small_pages());
    let err = exporter.export_all(&["notes"]).await.unwrap_err();

    assert!(matches!(err, Error::MalformedPage { .. }));
    assert_eq!(store.read("notes").await.unwrap(), previous);
}

#[tokio::test]
async fn test_export_cursor_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teams/1843/meetings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meetings": [{"meeting_id": "m-1"}],
            "pagination": {}
        })))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let store = SnapshotStore::new(dir.path());
    let client = client_for(&server);
    let exporter = Exporter::new(&client, &store);

    let cursor = TokenCursor::new("meetings", "/teams/1843/meetings", "meetings", 500);
    let written = exporter.export(&cursor).await.unwrap();

    assert_eq!(written.records, 1);
    assert_eq!(written.path, dir.path().join("meetings.json"));
}
