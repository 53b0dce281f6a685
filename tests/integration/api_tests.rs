//! API endpoint integration tests
//!
//! Exercises the HTTP surface against a wiremock admin backend, including
//! the three list envelope shapes the backend has shipped.

use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::*;

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/health").await;
    response.assert_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    app.get("/api/v1/health/live").await.assert_ok();
}

#[tokio::test]
async fn test_readiness_probes_admin_backend() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/activity/types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(activity_types_payload()))
        .mount(&app.admin_backend)
        .await;

    let response = app.get("/api/v1/health/ready").await;
    response.assert_ok();
}

#[tokio::test]
async fn test_readiness_fails_when_backend_is_down() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/activity/types"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.admin_backend)
        .await;

    let response = app.get("/api/v1/health/ready").await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_list_activity_bare_array_envelope() {
    let app = TestApp::new().await;

    let payload = bare_array_envelope(vec![
        raw_record("user_login"),
        raw_record("project_creation"),
    ]);
    Mock::given(method("GET"))
        .and(path("/admin/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&app.admin_backend)
        .await;

    let response = app.get("/api/v1/activity").await;
    response.assert_ok();
    let body: Value = response.json();
    assert_eq!(body["activities"].as_array().unwrap().len(), 2);
    assert_eq!(body["activities"][0]["activity_type"], "user_login");
    // Pagination is synthesized when the backend omits it
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["total"], 2);
}

#[tokio::test]
async fn test_list_activity_keyed_envelope() {
    let app = TestApp::new().await;

    let payload = keyed_envelope(vec![raw_record("user_creation")], 2, 25, 60);
    Mock::given(method("GET"))
        .and(path("/admin/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&app.admin_backend)
        .await;

    let response = app.get("/api/v1/activity?page=2").await;
    response.assert_ok();
    let body: Value = response.json();
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["total"], 60);
    assert_eq!(body["pagination"]["total_pages"], 3);
    // The pager window is included alongside the page
    let window = body["page_window"].as_array().unwrap();
    assert_eq!(window.first().unwrap(), &json!(1));
    assert_eq!(window.last().unwrap(), &json!(3));
}

#[tokio::test]
async fn test_list_activity_data_envelope() {
    let app = TestApp::new().await;

    let payload = data_envelope(vec![raw_record("user_delete")], 1, 25, 1);
    Mock::given(method("GET"))
        .and(path("/admin/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&app.admin_backend)
        .await;

    let response = app.get("/api/v1/activity").await;
    response.assert_ok();
    let body: Value = response.json();
    assert_eq!(body["activities"][0]["activity_type"], "user_delete");
    // A single page produces no pager window
    assert!(body["page_window"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_activity_backend_failure_maps_to_bad_gateway() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/activity"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&app.admin_backend)
        .await;

    let response = app.get("/api/v1/activity").await;
    response.assert_bad_gateway();
    let body: Value = response.json();
    assert_eq!(body["error"], "upstream_error");
    assert_eq!(body["message"], "Upstream error: Failed to load activity feed");
}

#[tokio::test]
async fn test_activity_types() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/activity/types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(activity_types_payload()))
        .mount(&app.admin_backend)
        .await;

    let response = app.get("/api/v1/activity/types").await;
    response.assert_ok();
    let types: Vec<String> = response.json();
    assert!(types.contains(&"user_login".to_string()));
    assert!(types.contains(&"bulk_user_delete".to_string()));
}

#[tokio::test]
async fn test_activity_detail() {
    let app = TestApp::new().await;

    let record = raw_record("user_login");
    let id = record["id"].as_str().unwrap().to_string();
    Mock::given(method("GET"))
        .and(path(format!("/admin/activity/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(record))
        .mount(&app.admin_backend)
        .await;

    let response = app.get(&format!("/api/v1/activity/{}", id)).await;
    response.assert_ok();
    let body: Value = response.json();
    assert_eq!(body["id"].as_str().unwrap(), id);
    assert_eq!(body["activity_type"], "user_login");
    assert_eq!(body["user"]["username"], "alice");
}

#[tokio::test]
async fn test_activity_detail_not_found() {
    let app = TestApp::new().await;

    let id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/admin/activity/{}", id)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&app.admin_backend)
        .await;

    let response = app.get(&format!("/api/v1/activity/{}", id)).await;
    response.assert_not_found();
}

#[tokio::test]
async fn test_export_csv_headers_and_body() {
    let app = TestApp::new().await;

    let payload = bare_array_envelope(vec![raw_record("user_login")]);
    Mock::given(method("GET"))
        .and(path("/admin/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&app.admin_backend)
        .await;

    let response = app.get("/api/v1/activity/export").await;
    response.assert_ok();

    let content_type = response.headers.get("content-type").unwrap();
    assert_eq!(content_type, "text/csv; charset=utf-8");
    let disposition = response
        .headers
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment; filename=\"activity-log-"));
    assert!(disposition.contains(".csv"));

    let text = response.text();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "\"ID\",\"Activity Type\",\"User\",\"Project\",\"Target User\",\"IP Address\",\"Created At\",\"Details\""
    );
    assert!(lines.next().unwrap().contains("\"user_login\""));
}

#[tokio::test]
async fn test_export_json_format() {
    let app = TestApp::new().await;

    let payload = bare_array_envelope(vec![raw_record("user_creation")]);
    Mock::given(method("GET"))
        .and(path("/admin/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&app.admin_backend)
        .await;

    let response = app.get("/api/v1/activity/export?format=json").await;
    response.assert_ok();
    assert_eq!(
        response.headers.get("content-type").unwrap(),
        "application/json"
    );
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["activity_type"], "user_creation");
}

#[tokio::test]
async fn test_export_rejects_unknown_format() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/activity/export?format=xml").await;
    response.assert_bad_request();
}

#[tokio::test]
async fn test_security_events_classification() {
    let app = TestApp::new().await;

    // One successful login, one warning, one critical
    let payload = bare_array_envelope(vec![
        raw_record_with_details("user_login", json!({"success": true})),
        raw_record("permission_revoke"),
        raw_record("bulk_user_delete"),
    ]);
    Mock::given(method("GET"))
        .and(path("/admin/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&app.admin_backend)
        .await;

    let response = app.get("/api/v1/security/events").await;
    response.assert_ok();
    let body: Value = response.json();
    assert_eq!(body["summary"]["total_events"], 3);
    assert_eq!(body["summary"]["critical_events"], 1);
    assert_eq!(body["summary"]["failed_logins"], 0);
    assert_eq!(body["events"][1]["severity"], "warning");
    assert_eq!(body["events"][2]["severity"], "critical");
}

#[tokio::test]
async fn test_security_events_filters_non_security_kinds() {
    let app = TestApp::new().await;

    let payload = bare_array_envelope(vec![
        raw_record("project_creation"),
        raw_record_with_details("user_login", json!({"success": false})),
    ]);
    Mock::given(method("GET"))
        .and(path("/admin/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&app.admin_backend)
        .await;

    let response = app.get("/api/v1/security/events?days=3").await;
    response.assert_ok();
    let body: Value = response.json();
    assert_eq!(body["window_days"], 3);
    assert_eq!(body["summary"]["total_events"], 1);
    assert_eq!(body["summary"]["failed_logins"], 1);
}

#[tokio::test]
async fn test_statistics_overview() {
    let app = TestApp::new().await;

    let payload = bare_array_envelope(vec![
        raw_record_with_details("user_login", json!({"duration_ms": 100.0})),
        raw_record_with_details("user_creation", json!({"duration_ms": 300.0})),
        raw_record_with_details("user_delete", json!({"error_code": "forbidden"})),
        raw_record_with_details("user_login", json!({"success": false})),
    ]);
    Mock::given(method("GET"))
        .and(path("/admin/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&app.admin_backend)
        .await;

    let response = app.get("/api/v1/statistics").await;
    response.assert_ok();
    let body: Value = response.json();
    assert_eq!(body["overview"]["total_requests"], 4);
    assert_eq!(body["overview"]["success_count"], 2);
    assert_eq!(body["overview"]["failure_count"], 2);
    assert_eq!(body["overview"]["success_rate"].as_f64().unwrap(), 50.0);
    assert_eq!(body["overview"]["avg_duration_ms"].as_f64().unwrap(), 200.0);

    // All four pseudo-method buckets are always present
    assert_eq!(body["by_method"].as_array().unwrap().len(), 4);

    // The synthetic status split accounts for every failure
    let distributed: u64 = body["status_distribution"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["status"] != 200)
        .map(|s| s["count"].as_u64().unwrap())
        .sum();
    assert_eq!(distributed, 2);
}

#[tokio::test]
async fn test_statistics_empty_window() {
    let app = TestApp::new().await;

    Mock::given(method("GET"))
        .and(path("/admin/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&app.admin_backend)
        .await;

    let response = app.get("/api/v1/statistics?days=30").await;
    response.assert_ok();
    let body: Value = response.json();
    assert_eq!(body["window_days"], 30);
    assert_eq!(body["overview"]["total_requests"], 0);
    assert_eq!(body["overview"]["success_rate"].as_f64().unwrap(), 100.0);
}
