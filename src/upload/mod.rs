//! Image upload pipeline.
//!
//! # Architecture
//!
//! Uploads flow through one service that prefers the cloud provider and falls
//! back to local disk:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          upload handler (HTTP)          │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            UploadService                │
//! │  (extension whitelist, sanitization,    │
//! │   provider call, local fallback)        │
//! └──────────┬─────────────────┬────────────┘
//!            │                 │
//!            ▼                 ▼
//! ┌──────────────────┐  ┌──────────────────┐
//! │   ImageStore     │  │   local disk     │
//! │ (CloudinaryStore)│  │ (upload dir)     │
//! └──────────────────┘  └──────────────────┘
//! ```
//!
//! Any provider failure is logged and recovered by writing the file locally;
//! the request only fails when the local write fails too. A disallowed
//! extension is rejected before either backend is touched.
//!
//! # Usage
//!
//! ```ignore
//! use portfolio_backend::upload::{CloudinaryStore, UploadService};
//!
//! let service = UploadService::new(Some(store), "project_images");
//! let outcome = service.store(bytes, "screenshot.png").await?;
//! println!("stored as {} via {:?}", outcome.url, outcome.storage);
//! ```

mod cloudinary;

pub use cloudinary::{CloudinaryCredentials, CloudinaryStore};

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::UploadError;

/// Extensions accepted by the upload endpoint.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// URL prefix under which locally stored uploads are served.
pub const UPLOAD_URL_PREFIX: &str = "/project_images";

/// A remote image store.
///
/// `public_id` is the sanitized filename stem; the store decides the final
/// identifier and URL.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, data: Bytes, public_id: &str) -> Result<StoredImage, UploadError>;
}

/// An image accepted by a remote store.
#[derive(Debug, Clone)]
pub struct StoredImage {
    /// Identifier assigned by the store.
    pub id: String,
    /// Publicly reachable URL.
    pub url: String,
}

/// Which backend ended up holding an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Cloudinary,
    Local,
}

/// Result of a completed upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Stored filename (provider id, or the sanitized local name).
    pub filename: String,
    /// URL the frontend should reference.
    pub url: String,
    /// Backend that holds the bytes.
    pub storage: StorageBackend,
}

/// Accepts uploads, preferring the provider and falling back to local disk.
pub struct UploadService<S> {
    store: Option<S>,
    upload_dir: PathBuf,
}

impl<S: ImageStore> UploadService<S> {
    /// Create a service. `store: None` means local-only mode.
    pub fn new(store: Option<S>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            upload_dir: upload_dir.into(),
        }
    }

    /// Directory that receives local fallback writes.
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Whether a cloud provider is configured.
    pub fn has_provider(&self) -> bool {
        self.store.is_some()
    }

    /// Validate and persist one upload.
    ///
    /// Rejects empty filenames and disallowed extensions before touching any
    /// backend. Provider failures are recovered by the local fallback; only a
    /// failed local write surfaces as an error.
    pub async fn store(
        &self,
        data: Bytes,
        original_filename: &str,
    ) -> Result<UploadOutcome, UploadError> {
        if original_filename.is_empty() {
            return Err(UploadError::EmptyFilename);
        }
        if !extension_allowed(original_filename) {
            warn!(
                filename = original_filename,
                "rejected upload with disallowed extension"
            );
            return Err(UploadError::DisallowedExtension);
        }

        let sanitized = sanitize_filename(original_filename);
        if sanitized.is_empty() {
            return Err(UploadError::EmptyFilename);
        }

        if let Some(provider) = &self.store {
            let public_id = filename_stem(&sanitized);
            match provider.upload(data.clone(), public_id).await {
                Ok(stored) => {
                    info!(id = %stored.id, "image stored by provider");
                    return Ok(UploadOutcome {
                        filename: stored.id,
                        url: stored.url,
                        storage: StorageBackend::Cloudinary,
                    });
                }
                Err(err) => {
                    warn!(error = %err, "provider upload failed, falling back to local storage");
                }
            }
        }

        self.store_locally(data, sanitized).await
    }

    /// Write the file into the upload directory. Overwrites silently.
    async fn store_locally(
        &self,
        data: Bytes,
        filename: String,
    ) -> Result<UploadOutcome, UploadError> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let path = self.upload_dir.join(&filename);
        tokio::fs::write(&path, &data).await?;
        info!(path = %path.display(), "image stored locally");
        Ok(UploadOutcome {
            url: format!("{UPLOAD_URL_PREFIX}/{filename}"),
            filename,
            storage: StorageBackend::Local,
        })
    }
}

/// Whether the filename carries an allowed image extension.
///
/// A name without any `.` is disallowed, mirroring the extension whitelist
/// the frontend relies on.
pub fn extension_allowed(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Drops any directory part, maps everything outside `[A-Za-z0-9._-]` to
/// `_`, and strips leading dots so the result can never be a hidden file or
/// escape the upload directory.
pub fn sanitize_filename(filename: &str) -> String {
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

/// Filename without its final extension.
fn filename_stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}

// =============================================================================
// Tests
// =============================================================================
