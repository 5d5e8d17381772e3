use crate::domain::mapping::StubMapping;
use crate::domain::request::RecordedRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub mappings: usize,
    pub requests: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingsResponse {
    pub mappings: Vec<StubMapping>,
    pub meta: Meta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestsResponse {
    pub requests: Vec<RecordedRequest>,
    pub meta: Meta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSummary {
    pub source: String,
    pub loaded: usize,
}

/// Body of the 404 served when no stub matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnmatchedResponse {
    pub error: String,
    pub request: RecordedRequest,
}
