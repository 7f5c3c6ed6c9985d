#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tabula_api::config::ServerConfig;
use tabula_api::router::build_app_router;
use tabula_api::state::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        session_idle_timeout_secs: 3600,
        session_sweep_interval_secs: 60,
        max_upload_bytes: 64 * 1024,
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app() -> Router {
    build_app_router(AppState::new(test_config()))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, session: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = session {
        builder = builder.header(SESSION_HEADER, id);
    }
    builder
}

pub async fn get(app: &Router, uri: &str, session: Option<&str>) -> Response<Body> {
    send(app, request(Method::GET, uri, session).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: &Router, uri: &str, session: Option<&str>) -> Response<Body> {
    send(app, request(Method::DELETE, uri, session).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, session: Option<&str>, body: Value) -> Response<Body> {
    let req = request(Method::POST, uri, session)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn put_json(app: &Router, uri: &str, session: Option<&str>, body: Value) -> Response<Body> {
    let req = request(Method::PUT, uri, session)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

/// POST a single file as `multipart/form-data` under the given field name.
pub async fn post_multipart(
    app: &Router,
    uri: &str,
    field: &str,
    file_name: &str,
    contents: &[u8],
) -> Response<Body> {
    let boundary = "tabula-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, req).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Start a session and return its ID.
pub async fn start_session(app: &Router) -> String {
    let response = send(
        app,
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/sessions")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["session_id"]
        .as_str()
        .unwrap()
        .to_string()
}
