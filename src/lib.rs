//! # Portfolio Backend
//!
//! A content backend for a single-admin portfolio site, backed by SQLite.
//!
//! This library provides the JSON API a portfolio frontend reads its content
//! from, the admin endpoints that edit that content behind a cookie session,
//! and the static routes that serve the site itself. Project images go to
//! Cloudinary when it is configured and fall back to local disk when it is
//! not, so the server keeps working without any external account.
//!
//! ## Features
//!
//! - **Content API**: Profile, skills, projects, education and social links as JSON
//! - **Replace-all updates**: List content is swapped atomically in one transaction
//! - **Session auth**: HMAC-SHA256 tokens in an HttpOnly cookie, Argon2id password hashing
//! - **Image uploads**: Cloudinary provider with transparent local-disk fallback
//! - **Static site**: Serves the portfolio HTML/CSS/JS and uploaded images
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`db`] - SQLite pool, schema and per-entity repositories
//! - [`upload`] - Image store trait, Cloudinary client and local fallback
//! - [`server`] - Axum-based HTTP server, session auth and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Content and upload error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use portfolio_backend::{create_router, hash_password, RouterConfig, UploadService};
//! use portfolio_backend::upload::CloudinaryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = portfolio_backend::db::connect("sqlite:portfolio.db").await?;
//!     portfolio_backend::db::init_schema(&pool).await?;
//!
//!     // Local-only uploads; pass a CloudinaryStore to enable the provider
//!     let uploads: UploadService<CloudinaryStore> = UploadService::new(None, "project_images");
//!
//!     let password_hash = hash_password("admin123")?;
//!     let config = RouterConfig::new("my-secret-key", "admin", password_hash);
//!     let router = create_router(pool, uploads, config);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:10000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod server;
pub mod upload;

// Re-export commonly used types
pub use config::Config;
pub use db::{
    connect, init_schema, ContactMessage, ContactRepo, Education, EducationRepo, NewContactMessage,
    NewEducation, NewProject, NewSkill, NewSocialLink, Profile, ProfileRepo, ProfileUpdate,
    Project, ProjectRepo, Skill, SkillPatch, SkillRepo, SocialLink, SocialLinkRepo, StatsUpdate,
};
pub use error::{ContentError, UploadError};
pub use server::{
    create_dev_router, create_router, hash_password, require_session, verify_password,
    AdminCredentials, AppState, AuthError, ErrorResponse, HealthResponse, MessageResponse,
    RouterConfig, SessionAuth, UploadResponse, SESSION_COOKIE,
};
pub use upload::{
    CloudinaryCredentials, CloudinaryStore, ImageStore, StorageBackend, StoredImage, UploadOutcome,
    UploadService, ALLOWED_EXTENSIONS, UPLOAD_URL_PREFIX,
};
