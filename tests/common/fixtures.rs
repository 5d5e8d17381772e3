//! Server and mapping-directory helpers shared by the integration tests.

use http_stubs::config::ServerConfig;
use http_stubs::server::MockServer;
use std::path::Path;
use tempfile::TempDir;

/// Stub server on an ephemeral loopback port with no mappings.
pub async fn start_server() -> MockServer {
    MockServer::start(ServerConfig::ephemeral())
        .await
        .expect("start stub server")
}

/// Stub server on an ephemeral port with the ReqRes fixtures preloaded.
pub async fn start_reqres_server() -> MockServer {
    MockServer::start(ServerConfig::ephemeral().with_reqres_fixtures())
        .await
        .expect("start stub server with fixtures")
}

/// Temp directory holding `files` as (relative path, JSON content).
pub fn mapping_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for (name, content) in files {
        write_file(dir.path(), name, content);
    }
    dir
}

fn write_file(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create mapping subdir");
    }
    std::fs::write(path, content).expect("write mapping file");
}

pub const USERS_MAPPING: &str = r#"{
    "request": { "method": "GET", "urlPath": "/api/users", "queryParameters": { "page": { "equalTo": "2" } } },
    "response": { "status": 200, "jsonBody": { "page": 2, "data": [ { "id": 7, "first_name": "Michael" } ] } }
}"#;

pub const DELETE_MAPPING: &str = r#"[
    { "request": { "method": "DELETE", "urlPathPattern": "/api/users/[0-9]+" }, "response": { "status": 204 } }
]"#;

pub const BROKEN_REGEX_MAPPING: &str = r#"{
    "request": { "method": "GET", "urlPattern": "/api/(unclosed" },
    "response": { "status": 200 }
}"#;
