#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use realty_api::auth::jwt::{generate_access_token, JwtConfig};
use realty_api::auth::password::hash_password;
use realty_api::config::ServerConfig;
use realty_api::router::build_app_router;
use realty_api::state::AppState;
use realty_api::storage::ImageStore;
use realty_db::models::user::{CreateUser, User};
use realty_db::repositories::UserRepo;

pub const TEST_PASSWORD: &str = "secret123";

/// Small but real upload limit so oversize tests stay cheap.
pub const TEST_MAX_UPLOAD_BYTES: usize = 64 * 1024;

/// A router plus the temporary upload directory it writes into.
///
/// The directory is deleted when this is dropped, so keep it alive for the
/// whole test.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Filenames currently in the upload directory.
    pub fn stored_files(&self) -> Vec<String> {
        list_files(self.upload_dir.path())
    }

    pub fn token_for(&self, user: &User) -> String {
        generate_access_token(user.id, &user.role, &self.config.jwt).unwrap()
    }
}

fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: TEST_MAX_UPLOAD_BYTES,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_mins: 60,
        },
        admin_seed: None,
    }
}

/// Build the full application router over `pool` with a fresh upload directory.
///
/// Uses the same [`build_app_router`] as production, so the whole middleware
/// stack is exercised.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let config = test_config(upload_dir.path());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        images: Arc::new(ImageStore::new(upload_dir.path())),
    };

    TestApp {
        router: build_app_router(state, &config),
        config,
        upload_dir,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            phone: Some("9876543210".to_string()),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
}

/// Fake PNG bytes; only the declared content type is checked.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-an-image";

/// A multipart form holding a complete, valid listing.
pub fn listing_form(title: &str, city: &str) -> MultipartBody {
    MultipartBody::new()
        .text("title", title)
        .text("price", "4500000")
        .text("city", city)
        .text("type", "For Sale")
        .text("address", "12 MG Road")
        .text("bedroom", "3")
        .text("bathroom", "2")
        .text("garage", "1")
        .text("size", "1200")
        .text("year", "2015")
        .text("description", "Corner plot with garden")
        .file("image", "house.png", "image/png", PNG_BYTES)
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "realty-test-boundary-7MA4YWxkTrZu0gW";

/// Builder for `multipart/form-data` request bodies.
#[derive(Debug, Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn with_auth(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(t) => builder.header("Authorization", format!("Bearer {t}")),
        None => builder,
    }
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    get_auth(app, uri, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let request = with_auth(Request::builder().method(Method::GET).uri(uri), token)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, None, json).await
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    json: serde_json::Value,
) -> Response<Body> {
    let request = with_auth(Request::builder().method(method).uri(uri), token)
        .header("Content-Type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn send_empty(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
) -> Response<Body> {
    let request = with_auth(Request::builder().method(method).uri(uri), token)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    form: MultipartBody,
) -> Response<Body> {
    let request = with_auth(Request::builder().method(method).uri(uri), token)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(form.finish()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
