//! Stub mapping model: what a request must look like and what to answer with.
//!
//! The JSON shape is camelCase and follows the familiar mapping-file layout:
//!
//! ```json
//! {
//!   "request":  { "method": "GET", "url": "/api/unknown/2" },
//!   "response": { "status": 200, "jsonBody": { "data": { "id": 2 } } }
//! }
//! ```

use crate::domain::error::StubError;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Priority used when a mapping does not set one. Lower wins.
pub const DEFAULT_PRIORITY: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    #[default]
    Any,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Any => "ANY",
        }
    }

    /// Parse a method name case-insensitively. Unknown verbs yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            "HEAD" => Some(HttpMethod::Head),
            "OPTIONS" => Some(HttpMethod::Options),
            "ANY" => Some(HttpMethod::Any),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        HttpMethod::parse(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown HTTP method `{name}`")))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single header, query parameter or body is compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueMatcher {
    EqualTo(String),
    Contains(String),
    Matches(String),
    /// Structural JSON equality; key order is irrelevant. Accepts either a
    /// JSON value or a string holding JSON.
    EqualToJson(Value),
}

/// Selects which part of the URL is compared and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPattern {
    /// Path and query, exact.
    Equal(String),
    /// Path only, exact.
    PathEqual(String),
    /// Regex over path and query.
    Matching(String),
    /// Regex over path only.
    PathMatching(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPattern {
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, ValueMatcher>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query_parameters: BTreeMap<String, ValueMatcher>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body_patterns: Vec<ValueMatcher>,
}

impl RequestPattern {
    pub fn new(method: HttpMethod, url: UrlPattern) -> Self {
        let mut pattern = Self {
            method,
            ..Self::default()
        };
        pattern.set_url(url);
        pattern
    }

    /// Replace whichever URL matcher is set with `url`.
    pub fn set_url(&mut self, url: UrlPattern) {
        self.url = None;
        self.url_path = None;
        self.url_pattern = None;
        self.url_path_pattern = None;
        match url {
            UrlPattern::Equal(s) => self.url = Some(s),
            UrlPattern::PathEqual(s) => self.url_path = Some(s),
            UrlPattern::Matching(s) => self.url_pattern = Some(s),
            UrlPattern::PathMatching(s) => self.url_path_pattern = Some(s),
        }
    }

    /// Short human-readable form, e.g. `POST /api/users`.
    pub fn describe(&self) -> String {
        let url = self
            .url
            .as_deref()
            .or(self.url_path.as_deref())
            .or(self.url_pattern.as_deref())
            .or(self.url_path_pattern.as_deref())
            .unwrap_or("*");
        format!("{} {}", self.method, url)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDefinition {
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_body: Option<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_delay_milliseconds: Option<u64>,
}

fn default_status() -> u16 {
    200
}

impl Default for ResponseDefinition {
    fn default() -> Self {
        Self {
            status: default_status(),
            body: None,
            json_body: None,
            headers: BTreeMap::new(),
            fixed_delay_milliseconds: None,
        }
    }
}

impl ResponseDefinition {
    /// Body bytes as served. `jsonBody` takes precedence over `body`.
    pub fn rendered_body(&self) -> String {
        match (&self.json_body, &self.body) {
            (Some(json), _) => json.to_string(),
            (None, Some(body)) => body.clone(),
            (None, None) => String::new(),
        }
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.headers.keys().any(|k| k.eq_ignore_ascii_case(name))
    }

    /// Reject anything the server could not put on the wire.
    pub fn validate(&self) -> Result<(), StubError> {
        StatusCode::from_u16(self.status).map_err(|_| StubError::InvalidStatus(self.status))?;
        for (name, value) in &self.headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                return Err(StubError::InvalidHeaderName(name.clone()));
            }
            if HeaderValue::from_str(value).is_err() {
                return Err(StubError::InvalidHeaderValue(name.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StubMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    pub request: RequestPattern,
    #[serde(default)]
    pub response: ResponseDefinition,
}

impl StubMapping {
    pub fn new(request: RequestPattern, response: ResponseDefinition) -> Self {
        Self {
            id: None,
            name: None,
            priority: None,
            request,
            response,
        }
    }

    pub fn effective_priority(&self) -> u32 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }
}
