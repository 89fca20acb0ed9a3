//! HTTP request handlers for the portfolio content API.
//!
//! This module contains the Axum handlers for reading and mutating portfolio
//! content, the JSON error envelope, and the multipart upload endpoint.
//!
//! # Endpoints
//!
//! - `GET /get-all` - Aggregate snapshot of every content table
//! - `GET /get-profile`, `POST /update-profile` - Singleton profile
//! - `GET /get-skills`, `POST /update-skills`, `POST /update-skill/{id}` - Skills
//! - `GET /get-projects`, `POST /update-projects` - Projects
//! - `GET /get-education`, `POST /update-education` - Education entries
//! - `GET /get-social-links`, `POST /update-social-links` - Social links
//! - `POST /contact` - Store a visitor message
//! - `POST /upload-project-image` - Multipart image upload
//! - `GET /health` - Health check endpoint
//!
//! Every error leaves the server as JSON: `{"success": false, "error": <tag>,
//! "message": <text>}`. The replace-all endpoints echo the submitted list back
//! on success so the admin frontend can re-render without a second request.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Multipart, Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, error, warn};

use crate::config::{DEFAULT_IMAGE_DIR, DEFAULT_SITE_DIR};
use crate::db::{
    ContactRepo, EducationRepo, NewContactMessage, NewEducation, NewProject, NewSkill,
    NewSocialLink, ProfileRepo, ProfileUpdate, ProjectRepo, SkillPatch, SkillRepo, SocialLinkRepo,
};
use crate::error::{ContentError, UploadError};
use crate::upload::{ImageStore, StorageBackend, UploadService};

use super::auth::{AdminCredentials, SessionAuth};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state passed to all handlers via Axum's State extractor.
pub struct AppState<S: ImageStore> {
    /// Database pool shared by every content handler
    pub pool: SqlitePool,

    /// Image upload pipeline (provider plus local fallback)
    pub uploads: Arc<UploadService<S>>,

    /// Session token issuing and verification
    pub sessions: SessionAuth,

    /// Admin credentials checked by the login endpoint
    pub credentials: AdminCredentials,

    /// Directory serving `GET /images/{filename}`
    pub image_dir: PathBuf,

    /// Directory serving `GET /` and unmatched paths
    pub site_dir: PathBuf,
}

impl<S: ImageStore> AppState<S> {
    /// Create a new application state with default static-file directories.
    pub fn new(
        pool: SqlitePool,
        uploads: UploadService<S>,
        sessions: SessionAuth,
        credentials: AdminCredentials,
    ) -> Self {
        Self {
            pool,
            uploads: Arc::new(uploads),
            sessions,
            credentials,
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            site_dir: PathBuf::from(DEFAULT_SITE_DIR),
        }
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
}

impl<S: ImageStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            uploads: Arc::clone(&self.uploads),
            sessions: self.sessions.clone(),
            credentials: self.credentials.clone(),
            image_dir: self.image_dir.clone(),
            site_dir: self.site_dir.clone(),
        }
    }
}

// =============================================================================
// Request Extraction
// =============================================================================

/// JSON extractor whose rejection is the crate's JSON error envelope.
///
/// Axum's stock `Json` rejection replies with plain text; this wrapper turns
/// a malformed or missing body into the same `{"success": false, ...}` shape
/// every other error uses.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                let status = rejection.status();
                let message = rejection.body_text();
                warn!(
                    status = status.as_u16(),
                    "Rejected request body: {}", message
                );
                let error_response = ErrorResponse::with_status("invalid_request", message, status);
                Err((status, Json(error_response)).into_response())
            }
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`; mirrors the `success` flag of happy-path responses
    pub success: bool,

    /// Error type identifier (e.g., "not_found", "invalid_request")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Happy-path acknowledgement carrying no entity payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Always `true`
    pub success: bool,

    /// Human-readable confirmation
    pub message: String,
}

impl MessageResponse {
    /// Create a new success acknowledgement.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Response from a successful image upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Always `true`
    pub success: bool,

    /// Stored filename (provider id, or the sanitized local name)
    pub filename: String,

    /// URL the frontend should reference
    pub url: String,

    /// Backend that ended up holding the bytes
    pub storage: StorageBackend,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert ContentError to HTTP response.
///
/// This implementation logs errors appropriately based on their severity:
/// - 5xx errors are logged at ERROR level (server errors)
/// - 404s are logged at DEBUG level (common and expected)
/// - other 4xx errors are logged at WARN level (client errors)
impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            // 400 Bad Request - unusable payloads
            ContentError::EmptyUpdate => {
                (StatusCode::BAD_REQUEST, "invalid_request", self.to_string())
            }
            ContentError::EmptyForm => {
                (StatusCode::BAD_REQUEST, "invalid_request", self.to_string())
            }
            ContentError::NotAList { .. } => {
                (StatusCode::BAD_REQUEST, "invalid_request", self.to_string())
            }
            ContentError::InvalidPayload(_) => {
                (StatusCode::BAD_REQUEST, "invalid_request", self.to_string())
            }

            // 404 Not Found
            ContentError::ProfileNotFound => {
                (StatusCode::NOT_FOUND, "not_found", self.to_string())
            }
            ContentError::SkillNotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),

            // 500 Internal Server Error
            ContentError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                self.to_string(),
            ),
        };

        // Log errors based on severity
        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else if status == StatusCode::NOT_FOUND {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Resource not found: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

/// Convert UploadError to HTTP response.
///
/// Validation failures are client errors; anything that reaches a backend and
/// fails is a server error. Provider failures normally never surface here
/// because the upload service falls back to local disk first.
impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            // 400 Bad Request - rejected before any backend was touched
            UploadError::MissingFile => {
                (StatusCode::BAD_REQUEST, "invalid_request", self.to_string())
            }
            UploadError::EmptyFilename => {
                (StatusCode::BAD_REQUEST, "invalid_request", self.to_string())
            }
            UploadError::DisallowedExtension => {
                (StatusCode::BAD_REQUEST, "invalid_request", self.to_string())
            }
            UploadError::Multipart(_) => {
                (StatusCode::BAD_REQUEST, "invalid_request", self.to_string())
            }

            // 500 Internal Server Error - storage failures
            UploadError::Provider(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                self.to_string(),
            ),
            UploadError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                self.to_string(),
            ),
        };

        // Log errors based on severity
        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

/// Parse a replace-all payload, insisting on a JSON array.
///
/// A non-array body maps to the endpoint's "... must be a list" message;
/// array items that fail to deserialize map to a 400 with the serde error.
fn parse_list<T: DeserializeOwned>(
    payload: serde_json::Value,
    entity: &'static str,
) -> Result<Vec<T>, ContentError> {
    if !payload.is_array() {
        return Err(ContentError::NotAList { entity });
    }
    serde_json::from_value(payload).map_err(|err| ContentError::InvalidPayload(err.to_string()))
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle aggregate content requests.
///
/// # Endpoint
///
/// `GET /get-all`
///
/// # Response
///
/// `200 OK` with one object holding the profile (or `{}` when none exists)
/// and the full list of every child table:
/// ```json
/// {
///   "profile": {...},
///   "skills": [...],
///   "projects": [...],
///   "education": [...],
///   "social_links": [...]
/// }
/// ```
pub async fn get_all_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<serde_json::Value>, ContentError> {
    let profile = match ProfileRepo::first(&state.pool).await? {
        Some(profile) => json!(profile),
        None => json!({}),
    };
    let skills = SkillRepo::list(&state.pool).await?;
    let projects = ProjectRepo::list(&state.pool).await?;
    let education = EducationRepo::list(&state.pool).await?;
    let social_links = SocialLinkRepo::list(&state.pool).await?;

    Ok(Json(json!({
        "profile": profile,
        "skills": skills,
        "projects": projects,
        "education": education,
        "social_links": social_links,
    })))
}

/// Handle profile reads.
///
/// # Endpoint
///
/// `GET /get-profile`
///
/// # Response
///
/// `200 OK` with the profile row, or `{}` when no row exists yet.
pub async fn get_profile_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<serde_json::Value>, ContentError> {
    let payload = match ProfileRepo::first(&state.pool).await? {
        Some(profile) => json!(profile),
        None => json!({}),
    };
    Ok(Json(payload))
}

/// Handle partial profile updates.
///
/// # Endpoint
///
/// `POST /update-profile`
///
/// # Response
///
/// `200 OK` with `{"success": true, "profile": {...}}` carrying the merged
/// row as stored.
///
/// # Errors
///
/// - `400 Bad Request`: body carries no recognized field
/// - `404 Not Found`: the profile row has not been created yet
pub async fn update_profile_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
    AppJson(update): AppJson<ProfileUpdate>,
) -> Result<Json<serde_json::Value>, ContentError> {
    if update.is_empty() {
        return Err(ContentError::EmptyUpdate);
    }

    let profile = ProfileRepo::update_first(&state.pool, &update)
        .await?
        .ok_or(ContentError::ProfileNotFound)?;

    Ok(Json(json!({"success": true, "profile": profile})))
}

/// Handle skill list reads.
///
/// # Endpoint
///
/// `GET /get-skills`
pub async fn get_skills_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<crate::db::Skill>>, ContentError> {
    Ok(Json(SkillRepo::list(&state.pool).await?))
}

/// Handle skill replace-all requests.
///
/// # Endpoint
///
/// `POST /update-skills`
///
/// # Response
///
/// `200 OK` with `{"success": true, "skills": [...]}` echoing the submitted
/// list. The previous table contents are gone.
///
/// # Errors
///
/// - `400 Bad Request`: body is not a JSON array, or an item is malformed
pub async fn update_skills_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
    AppJson(payload): AppJson<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ContentError> {
    let skills: Vec<NewSkill> = parse_list(payload, "Skills")?;
    SkillRepo::replace_all(&state.pool, &skills).await?;
    Ok(Json(json!({"success": true, "skills": skills})))
}

/// Handle single-skill partial updates.
///
/// # Endpoint
///
/// `POST /update-skill/{id}`
///
/// # Response
///
/// `200 OK` with `{"success": true, "skill": {...}}` carrying the merged row.
/// Absent fields keep their stored value.
///
/// # Errors
///
/// - `400 Bad Request`: body carries no recognized field
/// - `404 Not Found`: no skill with that id
pub async fn update_skill_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
    Path(skill_id): Path<i64>,
    AppJson(patch): AppJson<SkillPatch>,
) -> Result<Json<serde_json::Value>, ContentError> {
    if patch.is_empty() {
        return Err(ContentError::EmptyUpdate);
    }

    let skill = SkillRepo::update(&state.pool, skill_id, &patch)
        .await?
        .ok_or(ContentError::SkillNotFound)?;

    Ok(Json(json!({"success": true, "skill": skill})))
}

/// Handle project list reads.
///
/// # Endpoint
///
/// `GET /get-projects`
pub async fn get_projects_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<crate::db::Project>>, ContentError> {
    Ok(Json(ProjectRepo::list(&state.pool).await?))
}

/// Handle project replace-all requests.
///
/// # Endpoint
///
/// `POST /update-projects`
///
/// # Response
///
/// `200 OK` with `{"success": true, "projects": [...]}` echoing the submitted
/// list.
///
/// # Errors
///
/// - `400 Bad Request`: body is not a JSON array, or an item is malformed
pub async fn update_projects_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
    AppJson(payload): AppJson<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ContentError> {
    let projects: Vec<NewProject> = parse_list(payload, "Projects")?;
    ProjectRepo::replace_all(&state.pool, &projects).await?;
    Ok(Json(json!({"success": true, "projects": projects})))
}

/// Handle education list reads.
///
/// # Endpoint
///
/// `GET /get-education`
pub async fn get_education_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<crate::db::Education>>, ContentError> {
    Ok(Json(EducationRepo::list(&state.pool).await?))
}

/// Handle education replace-all requests.
///
/// # Endpoint
///
/// `POST /update-education`
///
/// # Errors
///
/// - `400 Bad Request`: body is not a JSON array, or an item is malformed
pub async fn update_education_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
    AppJson(payload): AppJson<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ContentError> {
    let education: Vec<NewEducation> = parse_list(payload, "Education")?;
    EducationRepo::replace_all(&state.pool, &education).await?;
    Ok(Json(json!({"success": true, "education": education})))
}

/// Handle social link list reads.
///
/// # Endpoint
///
/// `GET /get-social-links`
pub async fn get_social_links_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<crate::db::SocialLink>>, ContentError> {
    Ok(Json(SocialLinkRepo::list(&state.pool).await?))
}

/// Handle social link replace-all requests.
///
/// # Endpoint
///
/// `POST /update-social-links`
///
/// # Errors
///
/// - `400 Bad Request`: body is not a JSON array, or an item is malformed
pub async fn update_social_links_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
    AppJson(payload): AppJson<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ContentError> {
    let social_links: Vec<NewSocialLink> = parse_list(payload, "Social links")?;
    SocialLinkRepo::replace_all(&state.pool, &social_links).await?;
    Ok(Json(json!({"success": true, "social_links": social_links})))
}

/// Handle contact form submissions.
///
/// # Endpoint
///
/// `POST /contact`
///
/// # Response
///
/// `200 OK` with `{"success": true, "message": "Message sent successfully!"}`.
/// Messages are append-only; nothing reads them back over HTTP.
///
/// # Errors
///
/// - `400 Bad Request`: body carries no recognized field
pub async fn contact_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
    AppJson(form): AppJson<NewContactMessage>,
) -> Result<Json<MessageResponse>, ContentError> {
    if form.is_empty() {
        return Err(ContentError::EmptyForm);
    }

    let stored = ContactRepo::insert(&state.pool, &form).await?;
    debug!(id = stored.id, "stored contact message");

    Ok(Json(MessageResponse::new("Message sent successfully!")))
}

/// Handle image uploads.
///
/// # Endpoint
///
/// `POST /upload-project-image` (multipart, field name `image`)
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "success": true,
///   "filename": "screenshot",
///   "url": "https://res.cloudinary.com/.../screenshot.png",
///   "storage": "cloudinary"
/// }
/// ```
///
/// `storage` is `"local"` when the provider is unconfigured or its upload
/// failed and the file landed in the upload directory instead.
///
/// # Errors
///
/// - `400 Bad Request`: no `image` field, empty filename, or disallowed extension
/// - `500 Internal Server Error`: the local fallback write failed
pub async fn upload_image_handler<S: ImageStore>(
    State(state): State<AppState<S>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| UploadError::Multipart(err.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|err| UploadError::Multipart(err.to_string()))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or(UploadError::MissingFile)?;
    let outcome = state.uploads.store(data, &filename).await?;

    Ok(Json(UploadResponse {
        success: true,
        filename: outcome.filename,
        url: outcome.url,
        storage: outcome.storage,
    }))
}

// =============================================================================
// Tests
// =============================================================================
