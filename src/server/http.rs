use crate::app::dto::*;
use crate::app::engine::StubEngine;
use crate::domain::mapping::{RequestPattern, ResponseDefinition, StubMapping};
use crate::domain::request::RecordedRequest;
use anyhow::Result;
use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderMap, Method, StatusCode, Uri, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

#[derive(Clone)]
pub struct HttpState {
    pub engine: StubEngine,
}

#[derive(Debug, Clone, serde::Serialize)]
struct ApiErrorBody {
    error: String,
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> impl IntoResponse {
    (status, Json(ApiErrorBody { error: msg.into() }))
}

// Extractor rejections default to text/plain 4xx; admin errors are always JSON.
fn bad_request(msg: String) -> Response {
    api_error(StatusCode::BAD_REQUEST, msg).into_response()
}

/// Admin API under `/__admin`; every other path is answered from the stubs.
pub fn build_router(engine: StubEngine) -> Router {
    let state = Arc::new(HttpState { engine });

    Router::new()
        .route("/__admin/health", get(health))
        .route("/__admin/mappings", get(list_mappings).post(create_mapping))
        .route(
            "/__admin/mappings/{id}",
            get(get_mapping).delete(delete_mapping),
        )
        .route("/__admin/reset", post(reset))
        .route("/__admin/requests", get(list_requests).delete(clear_requests))
        .route("/__admin/requests/count", post(count_requests))
        .fallback(serve_stub)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, engine: StubEngine, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(engine);

    tracing::info!(addr = %listener.local_addr()?, "stub server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn health(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(state.engine.health())
}

async fn list_mappings(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(state.engine.mappings())
}

async fn create_mapping(
    State(state): State<Arc<HttpState>>,
    mapping: Result<Json<StubMapping>, JsonRejection>,
) -> Response {
    let Json(mapping) = match mapping {
        Ok(mapping) => mapping,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    match state.engine.register(mapping) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(e) => api_error(StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

async fn get_mapping(
    State(state): State<Arc<HttpState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    match state.engine.mapping(id) {
        Some(mapping) => Json(mapping).into_response(),
        None => api_error(StatusCode::NOT_FOUND, format!("no mapping with id {id}")).into_response(),
    }
}

async fn delete_mapping(
    State(state): State<Arc<HttpState>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    match state.engine.remove(id) {
        Some(mapping) => Json(mapping).into_response(),
        None => api_error(StatusCode::NOT_FOUND, format!("no mapping with id {id}")).into_response(),
    }
}

async fn reset(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    state.engine.reset();
    Json(state.engine.health())
}

async fn list_requests(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(state.engine.requests())
}

async fn clear_requests(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    state.engine.reset_requests();
    Json(state.engine.health())
}

async fn count_requests(
    State(state): State<Arc<HttpState>>,
    pattern: Result<Json<RequestPattern>, JsonRejection>,
) -> Response {
    let Json(pattern) = match pattern {
        Ok(pattern) => pattern,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    match state.engine.count(&pattern) {
        Ok(count) => Json(count).into_response(),
        Err(e) => api_error(StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

async fn serve_stub(
    State(state): State<Arc<HttpState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let url = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let mut header_map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in &headers {
        let Ok(value) = value.to_str() else { continue };
        header_map
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    let mut request = RecordedRequest::new(method.as_str(), url, state.engine.clock().now());
    request.headers = header_map;
    request.body = String::from_utf8_lossy(&body).into_owned();

    let outcome = state.engine.respond(request);
    match outcome.response {
        Some(def) => {
            if let Some(ms) = def.fixed_delay_milliseconds {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            render(&def)
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(UnmatchedResponse {
                error: "no stub mapping matched the request".to_string(),
                request: outcome.request,
            }),
        )
            .into_response(),
    }
}

fn render(def: &ResponseDefinition) -> Response {
    let Ok(status) = StatusCode::from_u16(def.status) else {
        return api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("stub has invalid status {}", def.status),
        )
        .into_response();
    };

    let mut builder = Response::builder().status(status);
    for (name, value) in &def.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if def.json_body.is_some() && !def.has_header(CONTENT_TYPE.as_str()) {
        builder = builder.header(CONTENT_TYPE, "application/json");
    }
    match builder.body(Body::from(def.rendered_body())) {
        Ok(response) => response,
        Err(e) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("stub response could not be built: {e}"),
        )
        .into_response(),
    }
}
