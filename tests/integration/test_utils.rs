//! Test utilities for integration tests.
//!
//! This module provides a mock image store, request builders, and helpers for
//! assembling a fully wired router backed by an in-memory database and
//! temporary directories.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use portfolio_backend::db::{self, NewSkill, SkillRepo};
use portfolio_backend::error::UploadError;
use portfolio_backend::server::auth::hash_password;
use portfolio_backend::server::routes::{create_router, RouterConfig};
use portfolio_backend::upload::{ImageStore, StoredImage, UploadService};

pub const TEST_SECRET: &str = "test-secret-key-for-session-tokens";
pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "correct-horse-battery-staple";

// =============================================================================
// Mock Image Store with Upload Tracking
// =============================================================================

/// A mock image store that counts upload attempts and can be told to fail.
///
/// Clones share the counter, so a clone kept outside the upload service still
/// observes calls made through the service.
pub struct MockImageStore {
    fail: bool,
    upload_count: Arc<AtomicUsize>,
}

impl MockImageStore {
    pub fn new() -> Self {
        Self {
            fail: false,
            upload_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A store whose uploads always fail, to exercise the local fallback.
    pub fn failing() -> Self {
        Self {
            fail: true,
            upload_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn upload_count(&self) -> usize {
        self.upload_count.load(Ordering::SeqCst)
    }
}

impl Default for MockImageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MockImageStore {
    fn clone(&self) -> Self {
        Self {
            fail: self.fail,
            upload_count: Arc::clone(&self.upload_count),
        }
    }
}

#[async_trait]
impl ImageStore for MockImageStore {
    async fn upload(&self, _data: Bytes, public_id: &str) -> Result<StoredImage, UploadError> {
        self.upload_count.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(UploadError::Provider("mock outage".to_string()));
        }

        Ok(StoredImage {
            id: public_id.to_string(),
            url: format!("https://cdn.test/demo/{}.png", public_id),
        })
    }
}

// =============================================================================
// Test Application
// =============================================================================

/// A fully wired router plus the resources behind it.
///
/// The temp directories are carried here so they outlive the router.
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub upload_dir: TempDir,
    pub image_dir: TempDir,
    pub site_dir: TempDir,
}

/// Build an app without the session gate and without an upload provider.
pub async fn test_app() -> TestApp {
    build_app(None, false).await
}

/// Build an app without the session gate, uploading through `store`.
pub async fn test_app_with_store(store: MockImageStore) -> TestApp {
    build_app(Some(store), false).await
}

/// Build an app with the session gate armed.
///
/// `TEST_USERNAME` / `TEST_PASSWORD` are accepted at `/admin/login`.
pub async fn authed_test_app() -> TestApp {
    build_app(None, true).await
}

async fn build_app(store: Option<MockImageStore>, require_auth: bool) -> TestApp {
    let pool = db::connect("sqlite::memory:").await.unwrap();
    db::init_schema(&pool).await.unwrap();

    let upload_dir = TempDir::new().unwrap();
    let image_dir = TempDir::new().unwrap();
    let site_dir = TempDir::new().unwrap();

    let uploads = UploadService::new(store, upload_dir.path());

    let config = if require_auth {
        let password_hash = hash_password(TEST_PASSWORD).unwrap();
        RouterConfig::new(TEST_SECRET, TEST_USERNAME, password_hash)
    } else {
        RouterConfig::without_auth()
    }
    .with_image_dir(image_dir.path())
    .with_site_dir(site_dir.path());

    TestApp {
        router: create_router(pool.clone(), uploads, config),
        pool,
        upload_dir,
        image_dir,
        site_dir,
    }
}

// =============================================================================
// Request Builders
// =============================================================================

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_json_with_cookie(uri: &str, body: serde_json::Value, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

const MULTIPART_BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Build a multipart/form-data POST with a single form field.
///
/// `filename: None` sends a plain (non-file) field.
pub fn multipart_request(
    uri: &str,
    field_name: &str,
    filename: Option<&str>,
    data: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    match filename {
        Some(filename) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field_name}\"\r\n\r\n").as_bytes(),
        ),
    }
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

// =============================================================================
// Response Helpers
// =============================================================================

/// Collect a response body and parse it as JSON.
pub async fn response_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Log in with the test credentials and return the `name=value` cookie pair.
pub async fn login_cookie(router: &Router) -> String {
    let response = router
        .clone()
        .oneshot(post_json(
            "/admin/login",
            serde_json::json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

// =============================================================================
// Database Seeding
// =============================================================================

/// Insert the single profile row the content endpoints operate on.
///
/// The schema has no seed data, so tests that need an existing profile create
/// it here, the same way a deployment does out of band.
pub async fn seed_profile(pool: &SqlitePool) {
    sqlx::query(
        "INSERT INTO profile (name, role, about_text, projects_completed, technologies_learned, learning_mindset)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind("Ada Lovelace")
    .bind("Software Engineer")
    .bind("I build backends.")
    .bind(12_i64)
    .bind(7_i64)
    .bind(100_i64)
    .execute(pool)
    .await
    .unwrap();
}

/// Replace the skills table with a single known row and return its id.
pub async fn seed_skill(pool: &SqlitePool) -> i64 {
    SkillRepo::replace_all(
        pool,
        &[NewSkill {
            icon: "fa-gears".to_string(),
            title: "Rust".to_string(),
            description: Some("Systems programming".to_string()),
        }],
    )
    .await
    .unwrap();

    SkillRepo::list(pool).await.unwrap()[0].id
}
