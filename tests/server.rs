//! Preview server routes, driven in-process and over a socket.

mod common;

use std::sync::Arc;

use asset_mask::config::parse_config;
use asset_mask::{AssetPipeline, HttpServer};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use common::{config_with_roots, write_file, TestServer};

fn router_for(config: &asset_mask::AppConfig) -> Router {
    let pipeline = Arc::new(AssetPipeline::from_config(config).unwrap());
    HttpServer::new(&config.server, pipeline).router()
}

async fn get(router: Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_status_and_masks() {
    let router = router_for(&config_with_roots(&[]));

    let (status, body) = get(router.clone(), "/_assets/status").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "operational");
    assert_eq!(json["entries"], 5);

    let (status, body) = get(router, "/_assets/masks").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    let kinds: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["exact", "wildcard", "segment", "regex", "reference"]);
}

#[tokio::test]
async fn test_resources_route() {
    let router = router_for(&config_with_roots(&[]));
    let (status, body) = get(router, "/_assets/resources?path=/assets/logo").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"<link rel="stylesheet" type="text/css" href="assets.css" />"#);

    let router = router_for(&parse_config("").unwrap());
    let (status, body) = get(router, "/_assets/resources?path=/assets/logo").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_templates_route() {
    let root = TempDir::new().unwrap();
    write_file(root.path(), "card.tpl", "card");

    let router = router_for(&config_with_roots(&[root.path()]));
    let (status, body) = get(router, "/_assets/templates").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"<script id="tpl-card" type="text/template">card</script>"#);

    let router = router_for(&config_with_roots(&[]));
    let (status, _) = get(router, "/_assets/templates").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_templates_missing_root_is_server_error() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("gone");

    let router = router_for(&config_with_roots(&[missing.as_path()]));
    let (status, body) = get(router, "/_assets/templates").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("template root not found"));
}

#[tokio::test]
async fn test_page_shell_embeds_resources_and_templates() {
    let root = TempDir::new().unwrap();
    write_file(root.path(), "user/row.ejs", "<%= id %>");

    let router = router_for(&config_with_roots(&[root.path()]));
    let (status, body) = get(router, "/user/42").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<script type="text/javascript" src="user.js"></script>"#));
    assert!(body.contains(r#"<link rel="stylesheet/less" type="text/css" href="user.less" />"#));
    assert!(body.contains(r#"<script id="tpl-user-row" type="text/template"><%= id %></script>"#));
    assert!(!body.contains("home.js"));
}

#[tokio::test]
async fn test_request_id_is_set() {
    let router = router_for(&config_with_roots(&[]));
    let response = router
        .oneshot(Request::get("/_assets/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_served_over_tcp_until_shutdown() {
    let server = TestServer::spawn(config_with_roots(&[])).await;

    let response = reqwest::get(server.url("/_assets/resources?path=/"))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.text().await.unwrap(),
        r#"<script type="text/javascript" src="home.js"></script>"#
    );

    let response = reqwest::get(server.url("/page.html")).await.unwrap();
    let body = response.text().await.unwrap();
    assert!(body.contains(r#"<script type="module" src="page.js?ver=3"></script>"#));

    server.stop().await;
}
