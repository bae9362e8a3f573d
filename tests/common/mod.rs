//! Test utilities and common setup.

use std::path::PathBuf;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lanshare::{AppState, Authenticator, Config};
use tempfile::TempDir;
use tower::ServiceExt;

/// Lowest cost bcrypt accepts; keeps the suite fast.
pub const TEST_COST: u32 = 4;

/// A temporary served root. The `TempDir` must outlive the test.
pub fn test_root() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().canonicalize().unwrap();
    (temp_dir, root)
}

/// Create a test application serving `root`.
pub fn test_app(root: PathBuf, config: Config, auth: Authenticator) -> Router {
    lanshare::router(AppState::new(root, config, auth))
}

/// Create a test application without a password.
pub fn open_app(root: PathBuf) -> Router {
    test_app(root, Config::default(), Authenticator::open())
}

/// Create a test application protected by `password`.
pub async fn protected_app(root: PathBuf, password: &str) -> Router {
    let auth = Authenticator::configure_with_cost(Some(password.to_string()), TEST_COST)
        .await
        .unwrap();
    test_app(root, Config::default(), auth)
}

pub fn basic_auth(credentials: &str) -> String {
    format!("Basic {}", STANDARD.encode(credentials))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
) -> Response<Body> {
    let mut request = Request::builder().uri(uri).method(method);
    if let Some(value) = authorization {
        request = request.header(header::AUTHORIZATION, value);
    }

    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn body_string(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
