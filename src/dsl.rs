//! Builder DSL for stub mappings.
//!
//! ```
//! use http_stubs::dsl::*;
//!
//! let mapping = get(url_equal_to("/api/unknown/2"))
//!     .will_return(a_response().with_status(200).with_body(r#"{"data":{"id":2}}"#));
//! assert_eq!(mapping.response.status, 200);
//! ```

use crate::domain::mapping::{
    HttpMethod, RequestPattern, ResponseDefinition, StubMapping, UrlPattern, ValueMatcher,
};
use serde_json::Value;
use uuid::Uuid;

pub fn url_equal_to(url: impl Into<String>) -> UrlPattern {
    UrlPattern::Equal(url.into())
}

pub fn url_path_equal_to(path: impl Into<String>) -> UrlPattern {
    UrlPattern::PathEqual(path.into())
}

pub fn url_matching(regex: impl Into<String>) -> UrlPattern {
    UrlPattern::Matching(regex.into())
}

pub fn url_path_matching(regex: impl Into<String>) -> UrlPattern {
    UrlPattern::PathMatching(regex.into())
}

pub fn equal_to(value: impl Into<String>) -> ValueMatcher {
    ValueMatcher::EqualTo(value.into())
}

pub fn containing(value: impl Into<String>) -> ValueMatcher {
    ValueMatcher::Contains(value.into())
}

pub fn matching(regex: impl Into<String>) -> ValueMatcher {
    ValueMatcher::Matches(regex.into())
}

pub fn equal_to_json(json: Value) -> ValueMatcher {
    ValueMatcher::EqualToJson(json)
}

pub fn request(method: HttpMethod, url: UrlPattern) -> MappingBuilder {
    MappingBuilder {
        mapping: StubMapping::new(RequestPattern::new(method, url), ResponseDefinition::default()),
    }
}

pub fn get(url: UrlPattern) -> MappingBuilder {
    request(HttpMethod::Get, url)
}

pub fn post(url: UrlPattern) -> MappingBuilder {
    request(HttpMethod::Post, url)
}

pub fn put(url: UrlPattern) -> MappingBuilder {
    request(HttpMethod::Put, url)
}

pub fn delete(url: UrlPattern) -> MappingBuilder {
    request(HttpMethod::Delete, url)
}

pub fn patch(url: UrlPattern) -> MappingBuilder {
    request(HttpMethod::Patch, url)
}

pub fn any(url: UrlPattern) -> MappingBuilder {
    request(HttpMethod::Any, url)
}

/// Pattern for journal verification, e.g. `requested_for(HttpMethod::Post, url_equal_to("/api/users"))`.
pub fn requested_for(method: HttpMethod, url: UrlPattern) -> RequestPattern {
    RequestPattern::new(method, url)
}

pub fn get_requested_for(url: UrlPattern) -> RequestPattern {
    requested_for(HttpMethod::Get, url)
}

pub fn post_requested_for(url: UrlPattern) -> RequestPattern {
    requested_for(HttpMethod::Post, url)
}

pub fn a_response() -> ResponseBuilder {
    ResponseBuilder::default()
}

/// Shortcut for a 200 response with a JSON body.
pub fn ok_json(body: Value) -> ResponseBuilder {
    a_response().with_status(200).with_json_body(body)
}

#[derive(Debug, Clone)]
pub struct MappingBuilder {
    mapping: StubMapping,
}

impl MappingBuilder {
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.mapping.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.mapping.name = Some(name.into());
        self
    }

    pub fn at_priority(mut self, priority: u32) -> Self {
        self.mapping.priority = Some(priority);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, matcher: ValueMatcher) -> Self {
        self.mapping.request.headers.insert(name.into(), matcher);
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>, matcher: ValueMatcher) -> Self {
        self.mapping
            .request
            .query_parameters
            .insert(name.into(), matcher);
        self
    }

    pub fn with_request_body(mut self, matcher: ValueMatcher) -> Self {
        self.mapping.request.body_patterns.push(matcher);
        self
    }

    pub fn will_return(mut self, response: ResponseBuilder) -> StubMapping {
        self.mapping.response = response.definition;
        self.mapping
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseBuilder {
    definition: ResponseDefinition,
}

impl ResponseBuilder {
    pub fn with_status(mut self, status: u16) -> Self {
        self.definition.status = status;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.definition.body = Some(body.into());
        self.definition.json_body = None;
        self
    }

    pub fn with_json_body(mut self, body: Value) -> Self {
        self.definition.json_body = Some(body);
        self.definition.body = None;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.definition.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_fixed_delay(mut self, millis: u64) -> Self {
        self.definition.fixed_delay_milliseconds = Some(millis);
        self
    }

    pub fn build(self) -> ResponseDefinition {
        self.definition
    }
}
