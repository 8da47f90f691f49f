//! Mock SIORMA backend for testing
//!
//! Wraps a wiremock server with helpers for the endpoints the client calls.

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Mock backend server
pub struct BackendMockServer {
    pub server: MockServer,
}

impl BackendMockServer {
    /// Start a new mock backend
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Respond to `verb path` with a JSON body
    pub async fn mock_json(&self, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Respond to `verb path` with the usual success envelope around `data`
    pub async fn mock_ok(&self, verb: &str, route: &str, data: Value) {
        self.mock_json(verb, route, 200, json!({ "success": true, "message": "OK", "data": data }))
            .await;
    }

    pub async fn mock_me(&self, user: Value) {
        self.mock_ok("GET", "/api/me", json!({ "user": user })).await;
    }

    pub async fn mock_unauthorized(&self, verb: &str, route: &str) {
        self.mock_json(verb, route, 401, json!({ "message": "Unauthenticated." }))
            .await;
    }

    /// Login answering with a token and user record
    pub async fn mock_login(&self, token: &str, user: Value) {
        self.mock_ok("POST", "/api/login", json!({ "token": token, "user": user }))
            .await;
    }

    /// Binary response with optional `content-disposition`
    pub async fn mock_file(&self, route: &str, bytes: &[u8], content_type: &str, disposition: Option<&str>) {
        let mut response = ResponseTemplate::new(200).set_body_raw(bytes.to_vec(), content_type);
        if let Some(disposition) = disposition {
            response = response.insert_header("content-disposition", disposition);
        }

        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Every request the server saw, in order
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Requests sent to one path
    pub async fn requests_to(&self, route: &str) -> Vec<Request> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.url.path() == route)
            .collect()
    }

    /// Remove every mock and forget received requests
    pub async fn reset(&self) {
        self.server.reset().await;
    }
}

/// Header value of a recorded request as text
pub fn header_of(request: &Request, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
