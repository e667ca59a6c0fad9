//! Common utilities for the WAPI client
//!
//! Provides the request descriptor and the authenticated HTTP executor shared
//! by every resource module.

pub mod query;

use crate::error::{WapiError, WapiResult};
use crate::transport_trait::WapiTransport;
use query::append_directives;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

/// One WAPI call: method, path (with filters), directives and body
#[derive(Debug, Clone, PartialEq)]
pub struct WapiRequest {
    pub method: Method,
    /// Resource path or `/{ref}`, may already carry a query
    pub path: String,
    pub return_fields: Option<String>,
    pub max_results: Option<u32>,
    pub body: Option<Value>,
}

impl WapiRequest {
    /// GET `path` with an optional return-fields projection
    pub fn get(path: impl Into<String>, return_fields: Option<&str>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            return_fields: return_fields.map(str::to_string),
            max_results: None,
            body: None,
        }
    }

    /// POST `body` to `path`
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            return_fields: None,
            max_results: None,
            body: Some(body),
        }
    }

    /// PUT `body` to `path`
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::PUT,
            path: path.into(),
            return_fields: None,
            max_results: None,
            body: Some(body),
        }
    }

    /// DELETE `path`
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            return_fields: None,
            max_results: None,
            body: None,
        }
    }

    /// Cap the number of returned objects (GET only)
    pub fn with_max_results(mut self, max_results: Option<u32>) -> Self {
        self.max_results = max_results;
        self
    }

    /// Path plus query, relative to the versioned base URL
    pub fn uri(&self) -> String {
        append_directives(
            &self.path,
            &self.method,
            self.return_fields.as_deref(),
            self.max_results,
        )
    }
}

/// HTTP client wrapper with basic authentication
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    ///
    /// `base_url` is the versioned API root, e.g. `https://gm.example.com/wapi/v2.6.1`.
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from a request
    pub fn build_url(&self, request: &WapiRequest) -> String {
        format!("{}{}", self.base_url, request.uri())
    }

    async fn send(&self, request: WapiRequest) -> WapiResult<Value> {
        let url = self.build_url(&request);
        debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Accept", "application/json");
        if let Some(body) = &request.body {
            debug!("{} body: {}", request.method, body);
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("{} {} could not be sent: {}", request.method, request.path, e);
            WapiError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} {} failed: {}", request.method, request.path, status);
            return Err(WapiError::Remote {
                status: status.as_u16(),
                message: format!(
                    "{} {} failed: {} - {}",
                    request.method, request.path, status, body
                ),
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait::async_trait]
impl WapiTransport for HttpClient {
    async fn execute(&self, request: WapiRequest) -> WapiResult<Value> {
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_request_uri_carries_all_directives() {
        let request = WapiRequest::get("/record:a?name=h", Some("ttl")).with_max_results(Some(10));
        assert_eq!(
            request.uri(),
            "/record:a?name=h&_return_type=json&_return_fields%2B=ttl&_max_results=10"
        );
    }

    #[test]
    fn post_request_ignores_cap() {
        let request = WapiRequest::post("/network", json!({"network": "10.0.0.0/24"}))
            .with_max_results(Some(1000));
        assert_eq!(request.uri(), "/network?_return_type=json");
    }

    #[test]
    fn build_url_joins_base_and_uri() {
        let http = HttpClient::new(
            Client::new(),
            "https://gm.example.com/wapi/v2.6.1/",
            "admin",
            "secret",
        );
        assert_eq!(http.base_url(), "https://gm.example.com/wapi/v2.6.1");
        let url = http.build_url(&WapiRequest::delete("/record:a/ZG5z:host.example.com/default"));
        assert_eq!(
            url,
            "https://gm.example.com/wapi/v2.6.1/record:a/ZG5z:host.example.com/default?_return_type=json"
        );
    }
}
