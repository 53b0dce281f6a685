//! Test application setup utilities
//!
//! Provides a test instance of the application wired to a wiremock server
//! standing in for the admin backend.

use std::sync::Arc;

use axum::{body::Body, http::Request, Router};
use tower::ServiceExt;
use wiremock::MockServer;

use audit_webui::{
    api,
    config::{AdminApiConfig, AppConfig, DashboardConfig, LoggingConfig, ServerConfig},
    models::ActivityQuery,
    services::{ActivityFeed, AdminApiClient, AuditService},
    AppState,
};

/// Test application wrapper for integration testing
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub admin_backend: MockServer,
}

impl TestApp {
    /// Create a new test application backed by a fresh mock admin backend
    pub async fn new() -> Self {
        let admin_backend = MockServer::start().await;
        Self::with_backend(admin_backend).await
    }

    /// Create a test application against an existing mock server
    pub async fn with_backend(admin_backend: MockServer) -> Self {
        let config = test_config(&admin_backend.uri());

        let client = Arc::new(
            AdminApiClient::new(&config.admin_api).expect("Failed to create admin API client"),
        );
        let audit = Arc::new(AuditService::new(client.clone()));
        let feed_query = ActivityQuery::new().limit(config.dashboard.feed_limit);
        let feed = Arc::new(ActivityFeed::new(client, feed_query));

        let state = AppState {
            config,
            audit,
            feed,
        };

        let router = Router::new()
            .nest("/api/v1", api::routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            admin_backend,
        }
    }

    /// Make a GET request to the test application
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Make a POST request with an empty body
    pub async fn post(&self, uri: &str) -> TestResponse {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Make an arbitrary request
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: axum::http::StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: axum::body::Bytes,
}

impl TestResponse {
    /// Get the response body as a string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Parse the response body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse response as JSON")
    }

    /// Check if the response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Assert the response status
    pub fn assert_status(&self, expected: axum::http::StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    /// Assert the response status is OK (200)
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::OK)
    }

    /// Assert the response status is Bad Request (400)
    pub fn assert_bad_request(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::BAD_REQUEST)
    }

    /// Assert the response status is Not Found (404)
    pub fn assert_not_found(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::NOT_FOUND)
    }

    /// Assert the response status is Bad Gateway (502)
    pub fn assert_bad_gateway(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::BAD_GATEWAY)
    }
}

/// Create a test configuration pointed at a mock admin backend
pub fn test_config(admin_api_url: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            static_dir: None,
            serve_frontend: false,
        },
        admin_api: AdminApiConfig {
            url: admin_api_url.to_string(),
            timeout_secs: 5,
            api_token: None,
        },
        logging: LoggingConfig::default(),
        dashboard: DashboardConfig {
            refresh_interval_secs: 0, // No background refresh in tests
            ..DashboardConfig::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_creation() {
        let app = TestApp::new().await;
        assert!(!app.state.config.server.serve_frontend);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = TestApp::new().await;
        let response = app.get("/api/v1/health").await;
        response.assert_ok();
    }
}
