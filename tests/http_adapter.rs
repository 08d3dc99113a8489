//! HTTP adapter tests, driven through the Axum router without a socket.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;

use sitemap_router::http::{AppState, HttpServer, X_ROBOTS_TAG};

mod common;

fn app(web_root: &str) -> Router {
    let mut settings = common::settings();
    settings.web_root = web_root.to_string();
    let router = Arc::new(common::sample_router(settings));
    HttpServer::build_router(AppState { router })
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_view_is_served_as_json() {
    let response = get(app("/"), "/photos/42/?size=big").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[X_ROBOTS_TAG], "index,follow");

    let body = json(response).await;
    assert_eq!(body["outcome"], "view");
    assert_eq!(body["view"], "photo");
    assert_eq!(body["dynamic-url"], serde_json::json!(["42"]));
    assert_eq!(body["request-parameters"], "size=big");
}

#[tokio::test]
async fn test_redirects_carry_location() {
    let response = get(app("/"), "/contact?x=1").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[header::LOCATION], "/contact/?x=1");

    let response = get(app("/"), "/search/").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "https://www.example.com/");
}

#[tokio::test]
async fn test_not_found_names_view_and_language() {
    let response = get(app("/"), "/fr/nowhere/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json(response).await;
    assert_eq!(body, serde_json::json!({"view": "404", "language": "fr"}));
}

#[tokio::test]
async fn test_web_root_is_stripped() {
    let response = get(app("/site/"), "/site/contact/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json(response).await["url"], "/site/contact/");

    let response = get(app("/site/"), "/site/en/contact/").await;
    assert_eq!(response.headers()[header::LOCATION], "/site/contact/");

    let response = get(app("/site/"), "/site").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app("/site/"), "/elsewhere/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_double_slash_is_not_an_off_site_redirect() {
    for uri in ["//evil.com", "//evil.com/", "/en//evil.com/"] {
        let response = get(app("/"), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert!(response.headers().get(header::LOCATION).is_none(), "{uri}");
    }
}

#[tokio::test]
async fn test_location_is_percent_encoded() {
    let response = get(app("/"), "/caf%C3%A9").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[header::LOCATION], "/caf%C3%A9/");

    let response = get(app("/site/"), "/site/en/a%20b/").await;
    assert_eq!(response.headers()[header::LOCATION], "/site/a%20b/");
}
