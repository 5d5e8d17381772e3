//! Compiled form of a [`RequestPattern`]. Regexes and JSON literals are
//! parsed once at registration so matching never fails at request time.

use crate::domain::error::StubError;
use crate::domain::mapping::{HttpMethod, RequestPattern, ValueMatcher};
use crate::domain::request::RecordedRequest;
use regex::Regex;
use serde_json::Value;

#[derive(Debug, Clone)]
enum CompiledUrl {
    Any,
    Equal(String),
    PathEqual(String),
    Matching(Regex),
    PathMatching(Regex),
}

#[derive(Debug, Clone)]
pub enum CompiledValueMatcher {
    EqualTo(String),
    Contains(String),
    Matches(Regex),
    EqualToJson(Value),
}

impl CompiledValueMatcher {
    pub fn compile(matcher: &ValueMatcher) -> Result<Self, StubError> {
        Ok(match matcher {
            ValueMatcher::EqualTo(s) => CompiledValueMatcher::EqualTo(s.clone()),
            ValueMatcher::Contains(s) => CompiledValueMatcher::Contains(s.clone()),
            ValueMatcher::Matches(re) => CompiledValueMatcher::Matches(full_match(re)?),
            ValueMatcher::EqualToJson(Value::String(raw)) => {
                CompiledValueMatcher::EqualToJson(serde_json::from_str(raw)?)
            }
            ValueMatcher::EqualToJson(v) => CompiledValueMatcher::EqualToJson(v.clone()),
        })
    }

    pub fn matches(&self, actual: &str) -> bool {
        match self {
            CompiledValueMatcher::EqualTo(s) => actual == s,
            CompiledValueMatcher::Contains(s) => actual.contains(s.as_str()),
            CompiledValueMatcher::Matches(re) => re.is_match(actual),
            CompiledValueMatcher::EqualToJson(expected) => serde_json::from_str::<Value>(actual)
                .map(|v| &v == expected)
                .unwrap_or(false),
        }
    }
}

/// Anchors `pattern` so it must match the entire input.
fn full_match(pattern: &str) -> Result<Regex, StubError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| StubError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}

#[derive(Debug, Clone)]
pub struct RequestMatcher {
    method: HttpMethod,
    url: CompiledUrl,
    headers: Vec<(String, CompiledValueMatcher)>,
    query: Vec<(String, CompiledValueMatcher)>,
    body: Vec<CompiledValueMatcher>,
}

impl RequestMatcher {
    pub fn compile(pattern: &RequestPattern) -> Result<Self, StubError> {
        let set: Vec<&str> = [
            ("url", pattern.url.is_some()),
            ("urlPath", pattern.url_path.is_some()),
            ("urlPattern", pattern.url_pattern.is_some()),
            ("urlPathPattern", pattern.url_path_pattern.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect();
        if set.len() > 1 {
            return Err(StubError::ConflictingUrlMatchers(set.join(", ")));
        }

        let url = if let Some(u) = &pattern.url {
            CompiledUrl::Equal(u.clone())
        } else if let Some(p) = &pattern.url_path {
            CompiledUrl::PathEqual(p.clone())
        } else if let Some(re) = &pattern.url_pattern {
            CompiledUrl::Matching(full_match(re)?)
        } else if let Some(re) = &pattern.url_path_pattern {
            CompiledUrl::PathMatching(full_match(re)?)
        } else {
            CompiledUrl::Any
        };

        let headers = pattern
            .headers
            .iter()
            .map(|(k, m)| Ok((k.clone(), CompiledValueMatcher::compile(m)?)))
            .collect::<Result<Vec<_>, StubError>>()?;
        let query = pattern
            .query_parameters
            .iter()
            .map(|(k, m)| Ok((k.clone(), CompiledValueMatcher::compile(m)?)))
            .collect::<Result<Vec<_>, StubError>>()?;
        let body = pattern
            .body_patterns
            .iter()
            .map(CompiledValueMatcher::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            method: pattern.method,
            url,
            headers,
            query,
            body,
        })
    }

    pub fn matches(&self, req: &RecordedRequest) -> bool {
        self.method_matches(&req.method)
            && self.url_matches(req)
            && self
                .headers
                .iter()
                .all(|(name, m)| req.header(name).is_some_and(|v| m.matches(v)))
            && self
                .query
                .iter()
                .all(|(name, m)| req.query_param(name).is_some_and(|v| m.matches(&v)))
            && self.body.iter().all(|m| m.matches(&req.body))
    }

    fn method_matches(&self, method: &str) -> bool {
        self.method == HttpMethod::Any || self.method.as_str().eq_ignore_ascii_case(method)
    }

    fn url_matches(&self, req: &RecordedRequest) -> bool {
        match &self.url {
            CompiledUrl::Any => true,
            CompiledUrl::Equal(u) => req.url == *u,
            CompiledUrl::PathEqual(p) => req.path() == p,
            CompiledUrl::Matching(re) => re.is_match(&req.url),
            CompiledUrl::PathMatching(re) => re.is_match(req.path()),
        }
    }
}
