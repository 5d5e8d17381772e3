//! Admin API and matching behaviour against a live server.

mod common;

use common::fixtures::{
    BROKEN_REGEX_MAPPING, DELETE_MAPPING, USERS_MAPPING, mapping_dir, start_server,
};
use http_stubs::client::given;
use http_stubs::config::ServerConfig;
use http_stubs::domain::mapping::HttpMethod;
use http_stubs::dsl::*;
use http_stubs::server::MockServer;
use serde_json::json;
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_stub_lifecycle_through_admin_client() {
    let server = start_server().await;
    let admin = server.admin();

    let stored = admin
        .stub_for(get(url_equal_to("/ping")).will_return(a_response().with_body("pong")))
        .await
        .unwrap();
    let id = stored.id.expect("id assigned on registration");
    assert_eq!(admin.mappings().await.unwrap().meta.total, 1);

    let res = given().get(&server.url("/ping")).await.unwrap();
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.body(), "pong");

    assert!(admin.remove(id).await.unwrap());
    assert!(!admin.remove(id).await.unwrap());

    let res = given().get(&server.url("/ping")).await.unwrap();
    assert_eq!(res.status_code(), 404);
    let unmatched = res.json_path().unwrap();
    assert_eq!(unmatched.get_string("request.url").unwrap(), "/ping");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_invalid_stub_is_rejected() {
    let server = start_server().await;
    let err = server
        .admin()
        .stub_for(get(url_matching("/api/(")).will_return(a_response()))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("400"));
    assert_eq!(server.engine().mappings().meta.total, 0);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_priority_and_recency_decide_between_matches() {
    let server = start_server().await;
    let admin = server.admin();

    admin
        .stub_for(
            any(url_path_matching("/api/.*"))
                .at_priority(10)
                .will_return(a_response().with_status(503)),
        )
        .await
        .unwrap();
    admin
        .stub_for(get(url_equal_to("/api/unknown/2")).will_return(a_response().with_status(200)))
        .await
        .unwrap();
    admin
        .stub_for(get(url_equal_to("/api/unknown/2")).will_return(a_response().with_status(202)))
        .await
        .unwrap();

    let exact = given().get(&server.url("/api/unknown/2")).await.unwrap();
    assert_eq!(exact.status_code(), 202);

    let fallback = given().get(&server.url("/api/other")).await.unwrap();
    assert_eq!(fallback.status_code(), 503);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_header_and_body_matchers_over_http() {
    let server = start_server().await;
    server
        .admin()
        .stub_for(
            post(url_equal_to("/api/register"))
                .with_header("Content-Type", containing("json"))
                .with_request_body(equal_to_json(json!({
                    "email": "eve.holt@reqres.in",
                    "password": "pistol"
                })))
                .will_return(ok_json(json!({ "id": 4 }))),
        )
        .await
        .unwrap();

    let ok = given()
        .content_type_json()
        .body(r#"{ "password": "pistol", "email": "eve.holt@reqres.in" }"#)
        .post(&server.url("/api/register"))
        .await
        .unwrap();
    assert_eq!(ok.status_code(), 200);

    let missing_password = given()
        .content_type_json()
        .json(&json!({ "email": "sydney@fife" }))
        .post(&server.url("/api/register"))
        .await
        .unwrap();
    assert_eq!(missing_password.status_code(), 404);

    let wrong_content_type = given()
        .content_type("text/plain")
        .body(r#"{ "password": "pistol", "email": "eve.holt@reqres.in" }"#)
        .post(&server.url("/api/register"))
        .await
        .unwrap();
    assert_eq!(wrong_content_type.status_code(), 404);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_verify_counts_and_reset() {
    let server = start_server().await;
    let admin = server.admin();
    admin
        .stub_for(post(url_equal_to("/api/users")).will_return(a_response().with_status(201)))
        .await
        .unwrap();

    for _ in 0..3 {
        given().post(&server.url("/api/users")).await.unwrap();
    }
    given().get(&server.url("/api/users")).await.unwrap();

    admin
        .verify(3, &post_requested_for(url_equal_to("/api/users")))
        .await
        .unwrap();
    admin
        .verify(1, &get_requested_for(url_path_equal_to("/api/users")))
        .await
        .unwrap();
    assert!(
        admin
            .verify(5, &requested_for(HttpMethod::Any, url_equal_to("/api/users")))
            .await
            .is_err()
    );

    admin.reset().await.unwrap();
    let health = admin.health().await.unwrap();
    assert_eq!(health.mappings, 0);
    assert_eq!(health.requests, 0);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_fixed_delay_is_applied() {
    let server = start_server().await;
    server
        .admin()
        .stub_for(get(url_equal_to("/slow")).will_return(a_response().with_fixed_delay(150)))
        .await
        .unwrap();

    let started = Instant::now();
    let res = given().get(&server.url("/slow")).await.unwrap();
    assert_eq!(res.status_code(), 200);
    assert!(started.elapsed() >= Duration::from_millis(150));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_mappings_loaded_from_directory_at_startup() {
    let dir = mapping_dir(&[("users.json", USERS_MAPPING), ("more/delete.json", DELETE_MAPPING)]);
    let config = ServerConfig {
        mappings: Some(dir.path().to_path_buf()),
        ..ServerConfig::ephemeral()
    };
    let server = MockServer::start(config).await.unwrap();
    assert_eq!(server.engine().mappings().meta.total, 2);

    let page = given()
        .query_param("page", "2")
        .get(&server.url("/api/users"))
        .await
        .unwrap();
    assert_eq!(page.status_code(), 200);
    assert_eq!(
        page.json_path().unwrap().get_string("data[0].first_name").unwrap(),
        "Michael"
    );

    let other_page = given().get(&server.url("/api/users?page=3")).await.unwrap();
    assert_eq!(other_page.status_code(), 404);

    let deleted = given().delete(&server.url("/api/users/2")).await.unwrap();
    assert_eq!(deleted.status_code(), 204);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_startup_fails_on_invalid_mapping_file() {
    let dir = mapping_dir(&[("broken.json", BROKEN_REGEX_MAPPING)]);
    let config = ServerConfig {
        mappings: Some(dir.path().to_path_buf()),
        ..ServerConfig::ephemeral()
    };
    let err = MockServer::start(config).await.err().expect("startup should fail");
    assert!(format!("{err:#}").contains("invalid regex"));
}

#[tokio::test]
async fn test_journal_limit_applies_to_live_server() {
    let config = ServerConfig {
        journal_limit: Some(2),
        ..ServerConfig::ephemeral()
    };
    let server = MockServer::start(config).await.unwrap();
    for path in ["/a", "/b", "/c"] {
        given().get(&server.url(path)).await.unwrap();
    }
    let urls: Vec<_> = server
        .admin()
        .requests()
        .await
        .unwrap()
        .requests
        .into_iter()
        .map(|r| r.url)
        .collect();
    assert_eq!(urls, vec!["/b", "/c"]);
    server.stop().await.unwrap();
}
