use crate::adapters::clock::SystemClock;
use crate::app::dto::*;
use crate::domain::error::StubError;
use crate::domain::mapping::{RequestPattern, ResponseDefinition, StubMapping};
use crate::domain::ports::{Clock, MappingSource};
use crate::domain::registry::StubRegistry;
use crate::domain::request::RecordedRequest;
use anyhow::{Context as _, Result};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Shared stub state. Cloning is cheap; clones see the same registry.
#[derive(Clone)]
pub struct StubEngine {
    inner: Arc<RwLock<StubRegistry>>,
    clock: Arc<dyn Clock>,
}

/// Result of serving one request through the stub responder.
#[derive(Debug, Clone)]
pub struct StubOutcome {
    pub request: RecordedRequest,
    pub response: Option<ResponseDefinition>,
}

impl StubEngine {
    pub fn new() -> Self {
        Self::with_parts(StubRegistry::new(), Arc::new(SystemClock))
    }

    pub fn with_parts(registry: StubRegistry, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
            clock,
        }
    }

    // The registry keeps no invariant a panicking writer could half-apply,
    // so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, StubRegistry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StubRegistry> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn health(&self) -> HealthResponse {
        let registry = self.read();
        HealthResponse {
            status: "ok".to_string(),
            mappings: registry.mapping_count(),
            requests: registry.request_count(),
        }
    }

    pub fn register(&self, mapping: StubMapping) -> Result<StubMapping, StubError> {
        let stored = self.write().register(mapping)?;
        tracing::info!(
            id = ?stored.id,
            request = %stored.request.describe(),
            status = stored.response.status,
            "stub registered"
        );
        Ok(stored)
    }

    pub fn remove(&self, id: Uuid) -> Option<StubMapping> {
        let removed = self.write().remove(id);
        if removed.is_some() {
            tracing::info!(%id, "stub removed");
        }
        removed
    }

    pub fn mapping(&self, id: Uuid) -> Option<StubMapping> {
        self.read().get(id).cloned()
    }

    pub fn reset(&self) {
        self.write().reset();
        tracing::info!("stubs and request journal reset");
    }

    pub fn reset_requests(&self) {
        self.write().reset_journal();
    }

    pub fn mappings(&self) -> MappingsResponse {
        let mappings = self.read().mappings();
        MappingsResponse {
            meta: Meta {
                total: mappings.len(),
            },
            mappings,
        }
    }

    pub fn requests(&self) -> RequestsResponse {
        let requests = self.read().requests();
        RequestsResponse {
            meta: Meta {
                total: requests.len(),
            },
            requests,
        }
    }

    pub fn count(&self, pattern: &RequestPattern) -> Result<CountResponse, StubError> {
        let count = self.read().count_matching(pattern)?;
        Ok(CountResponse { count })
    }

    /// Journal `request` and pick the stub that answers it, if any.
    pub fn respond(&self, mut request: RecordedRequest) -> StubOutcome {
        let mut registry = self.write();
        let response = registry.find_match(&request).map(|mapping| {
            request.matched_stub_id = mapping.id;
            mapping.response.clone()
        });
        registry.record(request.clone());
        drop(registry);

        match &response {
            Some(def) => tracing::debug!(
                method = %request.method,
                url = %request.url,
                status = def.status,
                "stub matched"
            ),
            None => tracing::warn!(
                method = %request.method,
                url = %request.url,
                "no stub matched"
            ),
        }
        StubOutcome { request, response }
    }

    /// Register every mapping from `source`. Stops at the first invalid one.
    pub fn load_from(&self, source: &dyn MappingSource) -> Result<LoadSummary> {
        let description = source.describe();
        let mappings = source
            .load()
            .with_context(|| format!("Failed to load mappings from {description}"))?;
        let loaded = mappings.len();
        for mapping in mappings {
            let label = mapping.request.describe();
            self.register(mapping)
                .with_context(|| format!("Invalid mapping `{label}` in {description}"))?;
        }
        tracing::info!(source = %description, loaded, "mappings loaded");
        Ok(LoadSummary {
            source: description,
            loaded,
        })
    }
}

impl Default for StubEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::fixtures::ReqResFixtures;
    use crate::dsl::*;
    use chrono::Utc;

    #[test]
    fn test_respond_records_matched_and_unmatched() {
        let engine = StubEngine::new();
        let stored = engine
            .register(get(url_equal_to("/ping")).will_return(a_response().with_body("pong")))
            .unwrap();

        let hit = engine.respond(RecordedRequest::new("GET", "/ping", Utc::now()));
        assert_eq!(hit.response.unwrap().rendered_body(), "pong");
        assert_eq!(hit.request.matched_stub_id, stored.id);

        let miss = engine.respond(RecordedRequest::new("GET", "/pong", Utc::now()));
        assert!(miss.response.is_none());

        let journal = engine.requests();
        assert_eq!(journal.meta.total, 2);
        assert_eq!(journal.requests[0].matched_stub_id, stored.id);
        assert!(journal.requests[1].matched_stub_id.is_none());
    }

    #[test]
    fn test_load_fixtures_and_health() {
        let engine = StubEngine::with_parts(
            StubRegistry::new(),
            Arc::new(FixedClock(Utc::now())),
        );
        let summary = engine
            .load_from(&ReqResFixtures::new(engine.clock()))
            .unwrap();
        assert_eq!(summary.loaded, 3);

        let health = engine.health();
        assert_eq!(health.status, "ok");
        assert_eq!(health.mappings, 3);
        assert_eq!(health.requests, 0);
    }

    #[test]
    fn test_clones_share_state() {
        let engine = StubEngine::new();
        let other = engine.clone();
        engine
            .register(any(url_path_matching("/.*")).will_return(a_response()))
            .unwrap();
        assert_eq!(other.mappings().meta.total, 1);
        other.reset();
        assert_eq!(engine.mappings().meta.total, 0);
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let engine = StubEngine::new();
        let holder = engine.clone();
        let panicked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = holder.write();
            panic!("handler panicked while holding the registry");
        }));
        assert!(panicked.is_err());
        assert!(engine.inner.is_poisoned());

        engine
            .register(get(url_equal_to("/after")).will_return(a_response()))
            .unwrap();
        let hit = engine.respond(RecordedRequest::new("GET", "/after", Utc::now()));
        assert!(hit.response.is_some());

        let health = engine.health();
        assert_eq!(health.mappings, 1);
        assert_eq!(health.requests, 1);
    }
}
