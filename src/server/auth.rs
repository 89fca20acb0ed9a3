//! Session authentication for the admin API.
//!
//! This module provides cookie-based admin sessions backed by HMAC-SHA256
//! tokens, plus Argon2id password hashing for the stored admin credential.
//!
//! # Token Scheme
//!
//! A session token is the expiry timestamp joined to a MAC over it:
//!
//! ```text
//! token = "{expiry}.{mac}"
//! mac   = HMAC-SHA256(secret_key, "admin-session.{expiry}")
//! ```
//!
//! The token travels in the `portfolio_session` cookie (HttpOnly,
//! SameSite=Strict). The server stores nothing per session: possession of a
//! token with a valid MAC and an unexpired timestamp is the whole proof.
//!
//! # Security Properties
//!
//! - **Stateless**: No session table; restarting the server keeps sessions valid
//! - **Time-limited**: Tokens expire after a configurable TTL
//! - **Constant-time comparison**: MAC and username checks use constant-time
//!   comparison to prevent timing attacks
//! - **Hashed credential**: The admin password is held as an Argon2id PHC
//!   string, never as plaintext
//!
//! # Example
//!
//! ```rust
//! use portfolio_backend::server::auth::SessionAuth;
//! use std::time::Duration;
//!
//! // Create authenticator with secret key
//! let sessions = SessionAuth::new("my-secret-key", Duration::from_secs(3600));
//!
//! // Issue a token and verify it
//! let token = sessions.issue();
//! assert!(sessions.verify(&token).is_ok());
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use cookie::time::Duration as CookieDuration;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use crate::upload::ImageStore;

use super::handlers::{AppJson, AppState, ErrorResponse, MessageResponse};

// =============================================================================
// Types
// =============================================================================

/// HMAC-SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "portfolio_session";

/// Domain separation prefix mixed into every session MAC.
const TOKEN_CONTEXT: &str = "admin-session";

/// Authentication error types.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// Username or password did not match the admin credential
    InvalidCredentials,

    /// Request carried no session cookie
    MissingSession,

    /// Session token is malformed or its MAC does not verify
    InvalidSession,

    /// Session token has expired
    SessionExpired {
        /// When the token expired
        expired_at: u64,
        /// Current time
        current_time: u64,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidCredentials => write!(f, "Invalid credentials"),
            AuthError::MissingSession => write!(f, "Missing session cookie"),
            AuthError::InvalidSession => write!(f, "Invalid session token"),
            AuthError::SessionExpired {
                expired_at,
                current_time,
            } => write!(
                f,
                "Session expired at {} (current time: {})",
                expired_at, current_time
            ),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
            ),
            AuthError::MissingSession => (
                StatusCode::UNAUTHORIZED,
                "missing_session",
                self.to_string(),
            ),
            AuthError::InvalidSession => (
                StatusCode::UNAUTHORIZED,
                "invalid_session",
                self.to_string(),
            ),
            AuthError::SessionExpired { .. } => (
                StatusCode::UNAUTHORIZED,
                "session_expired",
                self.to_string(),
            ),
        };

        // Log authentication errors
        // A bad MAC or bad credentials could indicate an attack, log at warn.
        // Missing cookies and expired tokens are common and expected, log at debug.
        match &self {
            AuthError::InvalidCredentials | AuthError::InvalidSession => {
                warn!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Authentication failed: {}",
                    message
                );
            }
            _ => {
                debug!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Authentication failed: {}",
                    message
                );
            }
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt,
/// and hash).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

// =============================================================================
// Admin Credentials
// =============================================================================

/// The single admin identity, held as a username and an Argon2id PHC hash.
///
/// Hashing the password happens once at startup (or in test setup); this type
/// only ever verifies.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: String,
}

impl AdminCredentials {
    /// Create credentials from a username and a PHC-formatted password hash.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    /// The admin username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a submitted username and password pair.
    ///
    /// The password is always verified, even when the username already failed,
    /// so a wrong username costs the same time as a wrong password.
    pub fn verify(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let password_ok = verify_password(password, &self.password_hash).unwrap_or(false);
        let username_ok: bool = username
            .as_bytes()
            .ct_eq(self.username.as_bytes())
            .into();

        if password_ok && username_ok {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

// =============================================================================
// Session Tokens
// =============================================================================

/// Issues and verifies HMAC-SHA256 session tokens.
///
/// Tokens are `"{expiry}.{mac}"` where the MAC covers the expiry, so a
/// tampered timestamp fails verification.
#[derive(Clone)]
pub struct SessionAuth {
    /// Secret key for HMAC computation
    secret_key: Vec<u8>,

    /// How long issued tokens stay valid
    ttl: Duration,
}

impl SessionAuth {
    /// Create a new authenticator with the given secret key and token TTL.
    ///
    /// # Arguments
    ///
    /// * `secret_key` - The secret key used for HMAC computation. Should be
    ///   at least 32 bytes for security.
    /// * `ttl` - How long issued tokens stay valid
    pub fn new(secret_key: impl AsRef<[u8]>, ttl: Duration) -> Self {
        Self {
            secret_key: secret_key.as_ref().to_vec(),
            ttl,
        }
    }

    /// How long issued tokens stay valid.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token expiring `ttl` from now.
    pub fn issue(&self) -> String {
        let expiry = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + self.ttl.as_secs();

        self.issue_with_expiry(expiry)
    }

    /// Issue a token with a specific expiry timestamp.
    ///
    /// This is useful when you need to generate tokens for a specific time.
    pub fn issue_with_expiry(&self, expiry: u64) -> String {
        format!("{}.{}", expiry, self.compute_mac(expiry))
    }

    /// Verify a session token.
    ///
    /// # Returns
    ///
    /// `Ok(())` if the token is well-formed, unexpired, and its MAC matches;
    /// `Err(AuthError)` otherwise.
    pub fn verify(&self, token: &str) -> Result<(), AuthError> {
        let (expiry_str, mac_hex) = token.split_once('.').ok_or(AuthError::InvalidSession)?;
        let expiry: u64 = expiry_str.parse().map_err(|_| AuthError::InvalidSession)?;

        // Check expiry first; a forged timestamp still fails the MAC below
        let current_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        if current_time > expiry {
            return Err(AuthError::SessionExpired {
                expired_at: expiry,
                current_time,
            });
        }

        // Decode the provided MAC
        let provided_mac = hex::decode(mac_hex).map_err(|_| AuthError::InvalidSession)?;

        // Compute expected MAC
        let expected_mac_hex = self.compute_mac(expiry);
        let expected_mac =
            hex::decode(&expected_mac_hex).map_err(|_| AuthError::InvalidSession)?;

        // Constant-time comparison
        if provided_mac.ct_eq(&expected_mac).into() {
            Ok(())
        } else {
            Err(AuthError::InvalidSession)
        }
    }

    /// Compute the HMAC-SHA256 over the token context and expiry.
    fn compute_mac(&self, expiry: u64) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret_key).expect("HMAC can take key of any size");
        mac.update(TOKEN_CONTEXT.as_bytes());
        mac.update(b".");
        mac.update(expiry.to_string().as_bytes());
        let result = mac.finalize();

        // Return hex-encoded MAC
        hex::encode(result.into_bytes())
    }
}

/// Build the session cookie carrying `token`, valid for `ttl`.
///
/// HttpOnly keeps scripts away from the token; SameSite=Strict keeps the
/// browser from attaching it to cross-site requests.
pub fn session_cookie(token: String, ttl: Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(ttl.as_secs() as i64))
        .build()
}

/// Build the cookie used to clear the session on logout.
fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware requiring a valid admin session.
///
/// This middleware reads the session cookie, verifies its token, and rejects
/// unauthorized requests with a 401 status code.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware};
/// use portfolio_backend::server::auth::{SessionAuth, require_session};
///
/// let sessions = SessionAuth::new("secret-key", std::time::Duration::from_secs(86400));
/// let app = Router::new()
///     .route("/update-profile", post(update_profile_handler))
///     .layer(middleware::from_fn_with_state(sessions, require_session));
/// ```
pub async fn require_session(
    State(sessions): State<SessionAuth>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(AuthError::MissingSession)?;
    sessions.verify(cookie.value())?;

    // Continue to the handler
    Ok(next.run(request).await)
}

// =============================================================================
// Auth Endpoints
// =============================================================================

/// Login request body.
///
/// Both fields are optional on the wire; a missing field simply never matches
/// the stored credential, keeping the response a 401 rather than a 400.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

/// Response from the check-auth endpoint.
#[derive(Debug, Serialize)]
pub struct AuthStatus {
    /// Whether the request carried a valid, unexpired session
    pub logged_in: bool,
}

/// Handle admin login.
///
/// # Endpoint
///
/// `POST /admin/login` with JSON body `{"username": ..., "password": ...}`
///
/// # Response
///
/// `200 OK` with `{"success": true, "message": "Login successful"}` and a
/// `Set-Cookie` header carrying the session token.
///
/// # Errors
///
/// - `401 Unauthorized`: username or password did not match
pub async fn login_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), AuthError> {
    let username = body.username.as_deref().unwrap_or("");
    let password = body.password.as_deref().unwrap_or("");

    state.credentials.verify(username, password)?;

    let token = state.sessions.issue();
    let jar = jar.add(session_cookie(token, state.sessions.ttl()));
    info!(username = username, "admin logged in");

    Ok((jar, Json(MessageResponse::new("Login successful"))))
}

/// Handle admin logout.
///
/// # Endpoint
///
/// `POST /admin/logout`
///
/// # Response
///
/// `200 OK` with `{"success": true, "message": "Logged out"}` and a
/// `Set-Cookie` header clearing the session cookie. Always succeeds, with or
/// without a session.
pub async fn logout_handler(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(removal_cookie());
    (jar, Json(MessageResponse::new("Logged out")))
}

/// Handle session status checks.
///
/// # Endpoint
///
/// `GET /admin/check-auth`
///
/// # Response
///
/// `200 OK` with `{"logged_in": true|false}`. Never an error: a missing,
/// malformed, or expired token simply reads as logged out.
pub async fn check_auth_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
    jar: CookieJar,
) -> Json<AuthStatus> {
    let logged_in = jar
        .get(SESSION_COOKIE)
        .map(|cookie| state.sessions.verify(cookie.value()).is_ok())
        .unwrap_or(false);

    Json(AuthStatus { logged_in })
}

// =============================================================================
// Tests
// =============================================================================
