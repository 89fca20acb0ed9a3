//! Router configuration for the portfolio backend.
//!
//! This module defines the HTTP routes and applies middleware for session
//! authentication and CORS.
//!
//! # Route Structure
//!
//! ```text
//! /health                      - Health check (public)
//! /get-all                     - Aggregate content snapshot (public)
//! /get-profile                 - Profile read (public)
//! /get-skills, /get-projects,
//! /get-education,
//! /get-social-links            - List reads (public)
//! /contact                     - Contact form (public)
//! /admin/login|logout|check-auth - Session endpoints (public)
//! /, /images/*, /project_images/* - Static site files (public)
//!
//! /update-profile              - Profile merge (protected)
//! /update-skills, /update-skill/{id},
//! /update-projects, /update-education,
//! /update-social-links         - Content mutations (protected)
//! /upload-project-image        - Image upload (protected)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use portfolio_backend::server::routes::{create_router, RouterConfig};
//! use portfolio_backend::upload::{CloudinaryStore, UploadService};
//!
//! // Configure and create router
//! let config = RouterConfig::new("my-secret-key", "admin", password_hash)
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(pool, uploads, config);
//!
//! // Run the server
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:10000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::{
    check_auth_handler, login_handler, logout_handler, require_session, AdminCredentials,
    SessionAuth,
};
use super::handlers::{
    contact_handler, get_all_handler, get_education_handler, get_profile_handler,
    get_projects_handler, get_skills_handler, get_social_links_handler, health_handler,
    update_education_handler, update_profile_handler, update_projects_handler,
    update_skill_handler, update_skills_handler, update_social_links_handler,
    upload_image_handler, AppState,
};
use super::static_files::{serve_image, serve_project_image, serve_root, serve_site_file};
use crate::config::{DEFAULT_IMAGE_DIR, DEFAULT_SESSION_TTL_SECS, DEFAULT_SITE_DIR};
use crate::upload::{ImageStore, UploadService};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Secret key for session token MACs
    pub session_secret: String,

    /// Admin username accepted by the login endpoint
    pub admin_username: String,

    /// Argon2id PHC hash of the admin password
    pub admin_password_hash: String,

    /// Whether mutation routes require a valid session
    pub require_auth: bool,

    /// Session token lifetime in seconds
    pub session_ttl_secs: u64,

    /// Allowed CORS origins (None = allow any origin, without credentials)
    pub cors_origins: Option<Vec<String>>,

    /// Directory serving `GET /images/{filename}`
    pub image_dir: PathBuf,

    /// Directory serving `GET /` and unmatched paths
    pub site_dir: PathBuf,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - Mutation routes require a session
    /// - CORS allows any origin (without credentials)
    /// - Sessions last 24 hours
    /// - Tracing is enabled
    pub fn new(
        session_secret: impl Into<String>,
        admin_username: impl Into<String>,
        admin_password_hash: impl Into<String>,
    ) -> Self {
        Self {
            session_secret: session_secret.into(),
            admin_username: admin_username.into(),
            admin_password_hash: admin_password_hash.into(),
            require_auth: true,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            cors_origins: None, // Allow any origin by default
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            site_dir: PathBuf::from(DEFAULT_SITE_DIR),
            enable_tracing: true,
        }
    }

    /// Create a configuration with the session gate disabled.
    ///
    /// **Warning**: This should only be used for development/testing.
    pub fn without_auth() -> Self {
        Self {
            session_secret: String::new(),
            admin_username: String::new(),
            admin_password_hash: String::new(),
            require_auth: false,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            cors_origins: None,
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            site_dir: PathBuf::from(DEFAULT_SITE_DIR),
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// With an explicit origin list the layer also allows credentials, which
    /// the session cookie needs for cross-origin admin frontends. Pass an
    /// empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin (without credentials).
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Set the session token lifetime in seconds.
    pub fn with_session_ttl_secs(mut self, seconds: u64) -> Self {
        self.session_ttl_secs = seconds;
        self
    }

    /// Enable or disable the session gate on mutation routes.
    pub fn with_auth_required(mut self, required: bool) -> Self {
        self.require_auth = required;
        self
    }

    /// Set the directory backing `GET /images/{filename}`.
    pub fn with_image_dir(mut self, image_dir: impl Into<PathBuf>) -> Self {
        self.image_dir = image_dir.into();
        self
    }

    /// Set the directory backing `GET /` and the HTML fallback.
    pub fn with_site_dir(mut self, site_dir: impl Into<PathBuf>) -> Self {
        self.site_dir = site_dir.into();
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Public routes (content reads, contact form, session endpoints, static files)
/// - Protected routes (content mutations and uploads, session-gated)
/// - CORS configuration
/// - Request tracing (optional)
///
/// # Arguments
///
/// * `pool` - Database pool backing the content handlers
/// * `uploads` - Upload service (provider plus local fallback)
/// * `config` - Router configuration
///
/// # Returns
///
/// A configured Axum router ready to be served.
pub fn create_router<S>(pool: SqlitePool, uploads: UploadService<S>, config: RouterConfig) -> Router
where
    S: ImageStore + 'static,
{
    let sessions = SessionAuth::new(
        &config.session_secret,
        Duration::from_secs(config.session_ttl_secs),
    );
    let credentials = AdminCredentials::new(&config.admin_username, &config.admin_password_hash);

    // Create application state
    let app_state = AppState::new(pool, uploads, sessions.clone(), credentials)
        .with_image_dir(&config.image_dir)
        .with_site_dir(&config.site_dir);

    // Build CORS layer
    let cors = build_cors_layer(&config);

    // Build the router
    let router = if config.require_auth {
        build_protected_router(app_state, sessions, cors)
    } else {
        build_open_router(app_state, cors)
    };

    // Add tracing if enabled
    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Routes that change content. The session gate wraps exactly this set.
fn mutation_routes<S>(app_state: AppState<S>) -> Router
where
    S: ImageStore + 'static,
{
    Router::new()
        .route("/update-profile", post(update_profile_handler::<S>))
        .route("/update-skills", post(update_skills_handler::<S>))
        .route("/update-skill/{id}", post(update_skill_handler::<S>))
        .route("/update-projects", post(update_projects_handler::<S>))
        .route("/update-education", post(update_education_handler::<S>))
        .route(
            "/update-social-links",
            post(update_social_links_handler::<S>),
        )
        .route("/upload-project-image", post(upload_image_handler::<S>))
        .with_state(app_state)
}

/// Routes that are always public: reads, the contact form, the session
/// endpoints, and the static site.
fn public_routes<S>(app_state: AppState<S>) -> Router
where
    S: ImageStore + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/get-all", get(get_all_handler::<S>))
        .route("/get-profile", get(get_profile_handler::<S>))
        .route("/get-skills", get(get_skills_handler::<S>))
        .route("/get-projects", get(get_projects_handler::<S>))
        .route("/get-education", get(get_education_handler::<S>))
        .route("/get-social-links", get(get_social_links_handler::<S>))
        .route("/contact", post(contact_handler::<S>))
        .route("/admin/login", post(login_handler::<S>))
        .route("/admin/logout", post(logout_handler))
        .route("/admin/check-auth", get(check_auth_handler::<S>))
        .route("/", get(serve_root::<S>))
        .route("/project_images/{filename}", get(serve_project_image::<S>))
        .route("/images/{filename}", get(serve_image::<S>))
        .fallback(get(serve_site_file::<S>))
        .with_state(app_state)
}

/// Build router with the session gate on every mutation route.
fn build_protected_router<S>(
    app_state: AppState<S>,
    sessions: SessionAuth,
    cors: CorsLayer,
) -> Router
where
    S: ImageStore + 'static,
{
    // Session middleware is applied to the mutation set only; everything the
    // public site needs stays reachable without a cookie
    let protected_routes = mutation_routes(app_state.clone()).layer(
        middleware::from_fn_with_state(sessions, require_session),
    );

    Router::new()
        .merge(protected_routes)
        .merge(public_routes(app_state))
        .layer(cors)
}

/// Build router without the session gate (for development/testing).
fn build_open_router<S>(app_state: AppState<S>, cors: CorsLayer) -> Router
where
    S: ImageStore + 'static,
{
    Router::new()
        .merge(mutation_routes(app_state.clone()))
        .merge(public_routes(app_state))
        .layer(cors)
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            // Parse origins into HeaderValues
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

            // Credentials require explicit origins; pairing them with a
            // wildcard makes browsers (and tower-http) reject the cookie
            cors.allow_origin(parsed_origins).allow_credentials(true)
        }
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Create a development router with the session gate disabled.
///
/// **Warning**: This should only be used for local development and testing.
/// Never use this in production.
pub fn create_dev_router<S>(pool: SqlitePool, uploads: UploadService<S>) -> Router
where
    S: ImageStore + 'static,
{
    create_router(pool, uploads, RouterConfig::without_auth())
}

// =============================================================================
// Tests
// =============================================================================
