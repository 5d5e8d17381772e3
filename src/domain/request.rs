use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A request as seen by the stub responder, kept in the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedRequest {
    pub id: Uuid,
    pub method: String,
    /// Path plus query string, e.g. `/api/users?page=2`.
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: String,
    pub logged_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_stub_id: Option<Uuid>,
}

impl RecordedRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>, logged_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            method: method.into(),
            url: url.into(),
            headers: BTreeMap::new(),
            body: String::new(),
            logged_at,
            matched_stub_id: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn path(&self) -> &str {
        self.url.split_once('?').map_or(self.url.as_str(), |(path, _)| path)
    }

    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, q)| q)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// First decoded value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_query_and_headers() {
        let req = RecordedRequest::new("GET", "/api/users?page=2&q=a%20b", Utc::now())
            .with_header("Content-Type", "application/json");
        assert_eq!(req.path(), "/api/users");
        assert_eq!(req.query(), Some("page=2&q=a%20b"));
        assert_eq!(req.query_param("q").as_deref(), Some("a b"));
        assert_eq!(req.query_param("missing"), None);
        assert_eq!(req.header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_path_without_query() {
        let req = RecordedRequest::new("GET", "/api/unknown/2", Utc::now());
        assert_eq!(req.path(), "/api/unknown/2");
        assert_eq!(req.query(), None);
    }
}
