//! HTTP client for the SIORMA backend
//!
//! Every request goes through [`ApiClient::execute`], which attaches the
//! bearer token, picks content negotiation headers from the payload,
//! classifies failures into [`ApiError`] and drops the session on a 401.

pub mod payload;
pub mod response;

pub use payload::{guess_content_type, prepare_headers, Attachment, FormBody, Payload};
pub use response::{error_details, extract_data, extract_list, extract_one, first_string, Blob};

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::session::{InvalidationReason, SessionContext};
use crate::utils::errors::{ApiError, SiormaError, Result};
use crate::utils::helpers::filename_from_content_disposition;
use crate::utils::logging::log_api_call;

/// What a 401 means for the request that received it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnUnauthorized {
    /// The stored token was rejected; drop the session
    ExpireSession,
    /// The submitted credentials were rejected; the session stays as it is
    RejectCredentials,
}

/// Request wrapper shared by all services
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<SessionContext>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish()
    }
}

impl ApiClient {
    /// Create a new ApiClient instance
    pub fn new(config: &ApiConfig, session: Arc<SessionContext>) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(SiormaError::Config(format!(
                "API base URL must use http or https: {}",
                config.base_url
            )));
        }

        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// `scheme://host[:port]` of the backend, used to resolve storage paths
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Absolute URL for an API path (which may carry a query string)
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }

    /// Send a request and classify the outcome.
    ///
    /// Returns the response only for 2xx statuses. A 401 on a request that
    /// carried a token also invalidates the stored session.
    pub async fn execute(&self, method: Method, path: &str, payload: Payload) -> Result<Response> {
        self.execute_with(method, path, payload, OnUnauthorized::ExpireSession)
            .await
    }

    pub async fn execute_with(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        on_unauthorized: OnUnauthorized,
    ) -> Result<Response> {
        let url = self.endpoint(path)?;
        let token = self.session.current_token()?;
        let headers = prepare_headers(&payload, token.as_deref())?;

        let mut request = self.http.request(method.clone(), url).headers(headers);
        request = match payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(&body),
            Payload::Multipart(form) => {
                debug!(path = path, parts = ?form.part_names(), "Sending multipart form");
                request.multipart(form.into_multipart()?)
            }
        };

        let started = Instant::now();
        let response = request.send().await.map_err(|e| {
            warn!(method = %method, path = path, error = %e, "API request did not complete");
            ApiError::from(e)
        })?;
        let status = response.status();
        log_api_call(method.as_str(), path, status.as_u16(), started.elapsed().as_millis() as u64);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let (message, field_errors) = error_details(&body);
        let error = match (ApiError::from_status(status.as_u16(), message, field_errors), on_unauthorized) {
            (ApiError::Unauthorized { message }, OnUnauthorized::RejectCredentials) => {
                ApiError::InvalidCredentials { message }
            }
            (error, _) => error,
        };

        if matches!(error, ApiError::Unauthorized { .. }) && token.is_some() {
            if let Err(e) = self.session.invalidate(InvalidationReason::Unauthorized) {
                warn!(error = %e, "Failed to clear session after 401");
            }
        }

        Err(error.into())
    }

    /// Send a request and decode the JSON body; an empty body decodes as `null`
    pub async fn send(&self, method: Method, path: &str, payload: Payload) -> Result<Value> {
        self.send_with(method, path, payload, OnUnauthorized::ExpireSession)
            .await
    }

    async fn send_with(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        on_unauthorized: OnUnauthorized,
    ) -> Result<Value> {
        let response = self.execute_with(method, path, payload, on_unauthorized).await?;
        let bytes = response.bytes().await.map_err(ApiError::from)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            debug!(path = path, error = %e, "Response body is not JSON");
            ApiError::InvalidResponse(format!("expected JSON from {}: {}", path, e)).into()
        })
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.send(Method::GET, path, Payload::Empty).await
    }

    pub async fn post_json<T: serde::Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value> {
        self.send(Method::POST, path, Payload::json(body)?).await
    }

    /// POST credentials; a 401 means they were wrong, not that the session expired
    pub async fn post_credentials<T: serde::Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value> {
        self.send_with(Method::POST, path, Payload::json(body)?, OnUnauthorized::RejectCredentials)
            .await
    }

    pub async fn put_json<T: serde::Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value> {
        self.send(Method::PUT, path, Payload::json(body)?).await
    }

    pub async fn patch_json<T: serde::Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value> {
        self.send(Method::PATCH, path, Payload::json(body)?).await
    }

    /// POST a multipart form
    pub async fn post_form(&self, path: &str, form: FormBody) -> Result<Value> {
        self.send(Method::POST, path, Payload::Multipart(form)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.send(Method::DELETE, path, Payload::Empty).await
    }

    /// Fetch a binary body along with its type and suggested filename
    pub async fn get_blob(&self, path: &str, fallback_content_type: &str) -> Result<Blob> {
        let response = self.execute(Method::GET, path, Payload::Empty).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(fallback_content_type)
            .to_string();
        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_content_disposition);

        let bytes = response.bytes().await.map_err(ApiError::from)?.to_vec();
        debug!(path = path, bytes = bytes.len(), content_type = %content_type, "Downloaded blob");

        Ok(Blob {
            bytes,
            content_type,
            filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            user_agent: "siorma-test".to_string(),
        };
        ApiClient::new(&config, Arc::new(SessionContext::in_memory())).unwrap()
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let api = client("http://127.0.0.1:8000/");
        assert_eq!(api.endpoint("/api/ormawa").unwrap().as_str(), "http://127.0.0.1:8000/api/ormawa");
        assert_eq!(
            api.endpoint("api/admin/registrations?status=pending").unwrap().as_str(),
            "http://127.0.0.1:8000/api/admin/registrations?status=pending"
        );
    }

    #[test]
    fn test_origin_drops_path() {
        let api = client("https://siorma.example.com/backend");
        assert_eq!(api.origin(), "https://siorma.example.com");
        assert_eq!(api.endpoint("/api/me").unwrap().as_str(), "https://siorma.example.com/backend/api/me");
    }

    #[test]
    fn test_rejects_non_http_base() {
        let config = ApiConfig {
            base_url: "ftp://example.com".to_string(),
            user_agent: "x".to_string(),
        };
        let result = ApiClient::new(&config, Arc::new(SessionContext::in_memory()));
        assert!(matches!(result, Err(SiormaError::Config(_))));
    }
}
