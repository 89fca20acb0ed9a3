//! Session authentication integration tests.
//!
//! Tests verify:
//! - Login issues an HttpOnly session cookie
//! - Wrong or missing credentials are rejected with 401
//! - Mutation routes are gated on the cookie; reads are not
//! - check-auth reports session state without ever failing
//! - Logout clears the cookie
//! - Expired and tampered tokens are rejected

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use portfolio_backend::server::auth::{SessionAuth, SESSION_COOKIE};

use super::test_utils::{
    authed_test_app, get_request, login_cookie, post_json, post_json_with_cookie, response_json,
    seed_skill, TEST_PASSWORD, TEST_SECRET, TEST_USERNAME,
};

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = authed_test_app().await;

    let response = app
        .router
        .oneshot(post_json(
            "/admin/login",
            json!({ "username": TEST_USERNAME, "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE}=")));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Path=/"));

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
}

#[tokio::test]
async fn test_login_wrong_password_rejected() {
    let app = authed_test_app().await;

    let response = app
        .router
        .oneshot(post_json(
            "/admin/login",
            json!({ "username": TEST_USERNAME, "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = response_json(response).await;
    assert_eq!(error["success"], false);
    assert_eq!(error["error"], "invalid_credentials");
    assert_eq!(error["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_username_rejected() {
    let app = authed_test_app().await;

    let response = app
        .router
        .oneshot(post_json(
            "/admin/login",
            json!({ "username": "mallory", "password": TEST_PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_missing_fields_is_unauthorized_not_bad_request() {
    let app = authed_test_app().await;

    // An empty body is treated as empty credentials, matching the wire
    // contract the admin frontend expects
    let response = app
        .router
        .oneshot(post_json("/admin/login", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = response_json(response).await;
    assert_eq!(error["error"], "invalid_credentials");
}

// =============================================================================
// Mutation Gating
// =============================================================================

#[tokio::test]
async fn test_mutation_without_cookie_rejected() {
    let app = authed_test_app().await;
    seed_skill(&app.pool).await;

    let response = app
        .router
        .oneshot(post_json(
            "/update-skills",
            json!([{ "icon": "fa-x", "title": "X", "description": "x" }]),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = response_json(response).await;
    assert_eq!(error["error"], "missing_session");

    // The gate fired before the handler: table unchanged
    let rows = portfolio_backend::db::SkillRepo::list(&app.pool).await.unwrap();
    assert_eq!(rows[0].title, "Rust");
}

#[tokio::test]
async fn test_mutation_with_garbage_cookie_rejected() {
    let app = authed_test_app().await;

    let response = app
        .router
        .oneshot(post_json_with_cookie(
            "/update-skills",
            json!([]),
            &format!("{SESSION_COOKIE}=not-a-real-token"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = response_json(response).await;
    assert_eq!(error["error"], "invalid_session");
}

#[tokio::test]
async fn test_mutation_with_session_succeeds() {
    let app = authed_test_app().await;
    let cookie = login_cookie(&app.router).await;

    let response = app
        .router
        .oneshot(post_json_with_cookie(
            "/update-skills",
            json!([{ "icon": "fa-lock", "title": "Auth", "description": "works" }]),
            &cookie,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_reads_do_not_require_session() {
    let app = authed_test_app().await;

    for uri in [
        "/get-all",
        "/get-profile",
        "/get-skills",
        "/get-projects",
        "/get-education",
        "/get-social-links",
    ] {
        let response = app
            .router
            .clone()
            .oneshot(get_request(uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "GET {uri} should be public");
    }
}

#[tokio::test]
async fn test_contact_does_not_require_session() {
    let app = authed_test_app().await;

    let response = app
        .router
        .oneshot(post_json(
            "/contact",
            json!({ "name": "n", "email": "e", "message": "m" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// check-auth and Logout
// =============================================================================

#[tokio::test]
async fn test_check_auth_reflects_session_state() {
    let app = authed_test_app().await;

    // No cookie: logged out, but still 200
    let response = app
        .router
        .clone()
        .oneshot(get_request("/admin/check-auth"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["logged_in"], false);

    // Garbage cookie: still 200, still logged out
    let request = Request::builder()
        .uri("/admin/check-auth")
        .header(header::COOKIE, format!("{SESSION_COOKIE}=garbage"))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["logged_in"], false);

    // Valid cookie: logged in
    let cookie = login_cookie(&app.router).await;
    let request = Request::builder()
        .uri("/admin/check-auth")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["logged_in"], true);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = authed_test_app().await;

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE}=")));
    assert!(set_cookie.contains("Max-Age=0"));

    let body = response_json(response).await;
    assert_eq!(body["message"], "Logged out");
}

// =============================================================================
// Token Expiry and Tampering
// =============================================================================

#[tokio::test]
async fn test_expired_session_rejected() {
    let app = authed_test_app().await;

    // Forge a token that expired 100 seconds ago, signed with the real secret
    let sessions = SessionAuth::new(TEST_SECRET, Duration::from_secs(3600));
    let expired_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
        - 100;
    let token = sessions.issue_with_expiry(expired_at);

    let response = app
        .router
        .oneshot(post_json_with_cookie(
            "/update-skills",
            json!([]),
            &format!("{SESSION_COOKIE}={token}"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = response_json(response).await;
    assert_eq!(error["error"], "session_expired");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_rejected() {
    let app = authed_test_app().await;

    let other = SessionAuth::new("a-completely-different-secret", Duration::from_secs(3600));
    let token = other.issue();

    let response = app
        .router
        .oneshot(post_json_with_cookie(
            "/update-skills",
            json!([]),
            &format!("{SESSION_COOKIE}={token}"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = response_json(response).await;
    assert_eq!(error["error"], "invalid_session");
}

#[tokio::test]
async fn test_tampered_expiry_rejected() {
    let app = authed_test_app().await;
    let cookie = login_cookie(&app.router).await;

    // Push the expiry far into the future without re-signing
    let token = cookie
        .strip_prefix(&format!("{SESSION_COOKIE}="))
        .unwrap()
        .to_string();
    let (_, mac) = token.split_once('.').unwrap();
    let tampered = format!("9999999999.{mac}");

    let response = app
        .router
        .oneshot(post_json_with_cookie(
            "/update-skills",
            json!([]),
            &format!("{SESSION_COOKIE}={tampered}"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error = response_json(response).await;
    assert_eq!(error["error"], "invalid_session");
}
