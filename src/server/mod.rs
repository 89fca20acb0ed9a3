//! HTTP server layer for the portfolio backend.
//!
//! This module provides the JSON content API, the admin session endpoints,
//! and the static file routes for the portfolio site.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │      GET /get-all        POST /update-*        GET /images/*    │
//! │                                                                 │
//! │  ┌───────────┐ ┌───────────┐ ┌──────────────┐ ┌─────────────┐  │
//! │  │ handlers  │ │   auth    │ │ static_files │ │   routes    │  │
//! │  │ (content) │ │ (session) │ │ (site/image) │ │ (wiring)    │  │
//! │  └───────────┘ └───────────┘ └──────────────┘ └─────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod static_files;

pub use auth::{
    check_auth_handler, hash_password, login_handler, logout_handler, require_session,
    verify_password, AdminCredentials, AuthError, AuthStatus, LoginRequest, SessionAuth,
    SESSION_COOKIE,
};
pub use handlers::{
    contact_handler, get_all_handler, get_profile_handler, get_skills_handler, health_handler,
    update_profile_handler, update_skill_handler, update_skills_handler, upload_image_handler,
    AppJson, AppState, ErrorResponse, HealthResponse, MessageResponse, UploadResponse,
};
pub use routes::{create_dev_router, create_router, RouterConfig};
pub use static_files::{serve_image, serve_project_image, serve_root, serve_site_file};
