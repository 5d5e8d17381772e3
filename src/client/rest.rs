//! Fluent REST calls with JSON-path assertions on the response.
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use http_stubs::client::given;
//!
//! let res = given()
//!     .content_type_json()
//!     .get("http://localhost:5050/api/unknown/2")
//!     .await?;
//! assert_eq!(res.status_code(), 200);
//! assert_eq!(res.json_path()?.get_string("data.name")?, "fuchsia rose");
//! # Ok(())
//! # }
//! ```

use crate::domain::json_path::JsonView;
use crate::domain::mapping::HttpMethod;
use anyhow::{Context as _, Result, bail};
use serde_json::Value;
use std::collections::BTreeMap;

/// Start a request with a fresh client.
pub fn given() -> RequestSpec {
    RestClient::new().given()
}

#[derive(Debug, Clone, Default)]
pub struct RestClient {
    http: reqwest::Client,
}

impl RestClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn given(&self) -> RequestSpec {
        RequestSpec {
            http: self.http.clone(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestSpec {
    http: reqwest::Client,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<String>,
}

impl RequestSpec {
    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.header("Content-Type", content_type)
    }

    pub fn content_type_json(self) -> Self {
        self.content_type("application/json")
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json(self, body: &Value) -> Self {
        self.body(body.to_string())
    }

    pub async fn get(self, url: &str) -> Result<ApiResponse> {
        self.send(HttpMethod::Get, url).await
    }

    pub async fn post(self, url: &str) -> Result<ApiResponse> {
        self.send(HttpMethod::Post, url).await
    }

    pub async fn put(self, url: &str) -> Result<ApiResponse> {
        self.send(HttpMethod::Put, url).await
    }

    pub async fn patch(self, url: &str) -> Result<ApiResponse> {
        self.send(HttpMethod::Patch, url).await
    }

    pub async fn delete(self, url: &str) -> Result<ApiResponse> {
        self.send(HttpMethod::Delete, url).await
    }

    pub async fn send(self, method: HttpMethod, url: &str) -> Result<ApiResponse> {
        if method == HttpMethod::Any {
            bail!("ANY is a matcher wildcard, not a request method");
        }
        let method = reqwest::Method::from_bytes(method.as_str().as_bytes())
            .with_context(|| format!("Unsupported method {method}"))?;

        let mut req = self.http.request(method.clone(), url);
        for (name, value) in &self.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if !self.query.is_empty() {
            req = req.query(&self.query);
        }
        if let Some(body) = self.body {
            req = req.body(body);
        }

        let res = req
            .send()
            .await
            .with_context(|| format!("{method} {url} failed"))?;
        let status = res.status().as_u16();
        let mut headers = BTreeMap::new();
        for (name, value) in res.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read body of {method} {url}"))?;
        tracing::debug!(%method, %url, status, "rest call completed");

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

/// Fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    headers: BTreeMap<String, String>,
    body: String,
}

impl ApiResponse {
    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn json_path(&self) -> Result<JsonView> {
        let root: Value =
            serde_json::from_str(&self.body).context("Response body is not valid JSON")?;
        Ok(JsonView::new(root))
    }

    /// Body re-indented when it is JSON, verbatim otherwise. Also logged.
    pub fn pretty_print(&self) -> String {
        let pretty = serde_json::from_str::<Value>(&self.body)
            .ok()
            .and_then(|v| serde_json::to_string_pretty(&v).ok())
            .unwrap_or_else(|| self.body.clone());
        tracing::info!("{pretty}");
        pretty
    }
}
