//! Static file serving for the portfolio site.
//!
//! The same binary that serves the content API also serves the public site:
//! `index.html` at the root, any other file in the site directory via the
//! router fallback, and the two image namespaces. The fallback doubles as the
//! server-wide 404 handler, answering with `404.html` when the site ships
//! one.
//!
//! The fallback works on the raw request path, which is not percent-decoded,
//! so encoded traversal sequences read as literal filenames and miss. The
//! image routes do receive decoded path parameters; they accept a single bare
//! filename only, so a decoded `../` cannot get through either. Plain `..`
//! components, absolute paths, and backslashes are rejected outright.
//!
//! # Endpoints
//!
//! - `GET /` - `index.html` from the site directory
//! - `GET /project_images/{filename}` - Locally stored uploads
//! - `GET /images/{filename}` - Site images
//! - Fallback - Any other file in the site directory, else the 404 page

use std::path::{Component, Path as FsPath, PathBuf};

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::upload::ImageStore;

use super::handlers::AppState;

// =============================================================================
// Path Vetting
// =============================================================================

/// True when `filename` is a single, relative path component.
fn is_bare_filename(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains('/')
        && !filename.contains('\\')
        && filename != "."
        && filename != ".."
}

/// Resolve a request path against `root`, refusing anything that could step
/// outside it.
///
/// Nested relative paths ("css/site.css") are allowed; absolute paths, `..`
/// components, and backslashes are not.
fn resolve_under(root: &FsPath, request_path: &str) -> Option<PathBuf> {
    if request_path.contains('\\') {
        return None;
    }

    let relative = request_path.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let candidate = FsPath::new(relative);
    if candidate.is_absolute() {
        return None;
    }
    for component in candidate.components() {
        if !matches!(component, Component::Normal(_)) {
            return None;
        }
    }

    Some(root.join(relative))
}

// =============================================================================
// Response Building
// =============================================================================

/// Read `path` and build a response with a guessed Content-Type.
///
/// Returns `None` when the path does not name a readable file; directories
/// fail the read and fall out the same way.
async fn serve_file(path: &FsPath) -> Option<Response> {
    let data = tokio::fs::read(path).await.ok()?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .body(Body::from(data))
        .unwrap();

    Some(response)
}

/// The site-wide 404 response: `404.html` when the site ships one, a plain
/// text fallback otherwise.
async fn not_found_page(site_dir: &FsPath) -> Response {
    match tokio::fs::read(site_dir.join("404.html")).await {
        Ok(data) => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
            .body(Body::from(data))
            .unwrap(),
        Err(_) => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

/// Serve one bare filename out of `dir`, or the 404 page.
async fn serve_bare(dir: &FsPath, filename: &str, site_dir: &FsPath) -> Response {
    if !is_bare_filename(filename) {
        debug!(filename = filename, "rejected image path");
        return not_found_page(site_dir).await;
    }

    match serve_file(&dir.join(filename)).await {
        Some(response) => response,
        None => not_found_page(site_dir).await,
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Serve the landing page.
///
/// # Endpoint
///
/// `GET /`
pub async fn serve_root<S: ImageStore>(State(state): State<AppState<S>>) -> Response {
    match serve_file(&state.site_dir.join("index.html")).await {
        Some(response) => response,
        None => not_found_page(&state.site_dir).await,
    }
}

/// Serve a locally stored upload.
///
/// # Endpoint
///
/// `GET /project_images/{filename}`
///
/// Only needed for the local fallback; provider-hosted images are referenced
/// by their absolute URL and never pass through here.
pub async fn serve_project_image<S: ImageStore>(
    State(state): State<AppState<S>>,
    Path(filename): Path<String>,
) -> Response {
    serve_bare(state.uploads.upload_dir(), &filename, &state.site_dir).await
}

/// Serve a site image (profile photo, project shots, icons).
///
/// # Endpoint
///
/// `GET /images/{filename}`
pub async fn serve_image<S: ImageStore>(
    State(state): State<AppState<S>>,
    Path(filename): Path<String>,
) -> Response {
    serve_bare(&state.image_dir, &filename, &state.site_dir).await
}

/// Serve any other file in the site directory, or the 404 page.
///
/// Registered as the router fallback, which makes it the 404 handler for the
/// whole server: unmatched API paths land here too.
pub async fn serve_site_file<S: ImageStore>(
    State(state): State<AppState<S>>,
    uri: Uri,
) -> Response {
    let path = match resolve_under(&state.site_dir, uri.path()) {
        Some(path) => path,
        None => {
            debug!(path = uri.path(), "rejected site path");
            return not_found_page(&state.site_dir).await;
        }
    };

    match serve_file(&path).await {
        Some(response) => response,
        None => not_found_page(&state.site_dir).await,
    }
}

// =============================================================================
// Tests
// =============================================================================
