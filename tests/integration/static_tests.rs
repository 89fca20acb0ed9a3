//! Static file serving integration tests.
//!
//! Tests verify:
//! - The site root, nested site files, and both image namespaces
//! - Content-Type guessing from the file extension
//! - The 404.html fallback (and its plain-text stand-in)
//! - Path traversal attempts are turned away

use axum::http::StatusCode;
use http_body_util::BodyExt;
use tower::ServiceExt;

use super::test_utils::{get_request, test_app};

// =============================================================================
// Site Files
// =============================================================================

#[tokio::test]
async fn test_root_serves_index() {
    let app = test_app().await;
    std::fs::write(app.site_dir.path().join("index.html"), "<h1>hello</h1>").unwrap();

    let response = app.router.oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"<h1>hello</h1>");
}

#[tokio::test]
async fn test_fallback_serves_nested_site_file() {
    let app = test_app().await;
    std::fs::create_dir(app.site_dir.path().join("css")).unwrap();
    std::fs::write(app.site_dir.path().join("css/site.css"), "body {}").unwrap();

    let response = app
        .router
        .oneshot(get_request("/css/site.css"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/css"));
}

// =============================================================================
// Image Namespaces
// =============================================================================

#[tokio::test]
async fn test_site_image_served_from_image_dir() {
    let app = test_app().await;
    std::fs::write(app.image_dir.path().join("me.jpg"), b"jpeg bytes").unwrap();

    let response = app
        .router
        .oneshot(get_request("/images/me.jpg"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");
}

#[tokio::test]
async fn test_project_image_served_from_upload_dir() {
    let app = test_app().await;
    std::fs::write(app.upload_dir.path().join("shot.png"), b"png bytes").unwrap();

    let response = app
        .router
        .oneshot(get_request("/project_images/shot.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
}

#[tokio::test]
async fn test_missing_image_serves_site_404_page() {
    let app = test_app().await;
    std::fs::write(app.site_dir.path().join("404.html"), "<h1>lost</h1>").unwrap();

    let response = app
        .router
        .oneshot(get_request("/images/ghost.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"<h1>lost</h1>");
}

// =============================================================================
// 404 Fallback
// =============================================================================

#[tokio::test]
async fn test_unknown_path_serves_404_page_with_status() {
    let app = test_app().await;
    std::fs::write(app.site_dir.path().join("404.html"), "<h1>lost</h1>").unwrap();

    let response = app
        .router
        .oneshot(get_request("/no-such-page.html"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"<h1>lost</h1>");
}

#[tokio::test]
async fn test_unknown_path_plain_404_without_page() {
    let app = test_app().await;

    let response = app
        .router
        .oneshot(get_request("/no-such-page.html"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"404 Not Found");
}

// =============================================================================
// Traversal
// =============================================================================

#[tokio::test]
async fn test_fallback_rejects_dotdot_path() {
    let app = test_app().await;
    std::fs::write(app.site_dir.path().join("404.html"), "<h1>lost</h1>").unwrap();

    let response = app
        .router
        .oneshot(get_request("/../outside.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_fallback_rejects_nested_dotdot_path() {
    let app = test_app().await;

    let response = app
        .router
        .oneshot(get_request("/css/../../outside.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_image_route_rejects_encoded_traversal() {
    let app = test_app().await;

    // Decodes to "../../etc/passwd", which is not a bare filename
    let response = app
        .router
        .oneshot(get_request("/images/..%2F..%2Fetc%2Fpasswd"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_image_route_rejects_dotdot_filename() {
    let app = test_app().await;

    // ".." as the whole parameter
    let response = app
        .router
        .oneshot(get_request("/images/%2E%2E"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
