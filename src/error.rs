use thiserror::Error;

/// Errors from content reads and writes backed by the database
#[derive(Debug, Clone, Error)]
pub enum ContentError {
    /// Update body carried no usable fields
    #[error("No data provided")]
    EmptyUpdate,

    /// Contact form body carried no usable fields
    #[error("No form data provided")]
    EmptyForm,

    /// The singleton profile row has not been created yet
    #[error("Profile not found")]
    ProfileNotFound,

    /// No skill row with the requested id
    #[error("Skill not found")]
    SkillNotFound,

    /// Replace-all body was valid JSON but not a JSON array
    #[error("{entity} must be a list")]
    NotAList { entity: &'static str },

    /// Body was a JSON array but its items did not match the expected shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for ContentError {
    fn from(err: sqlx::Error) -> Self {
        ContentError::Database(err.to_string())
    }
}

/// Errors from the image upload pipeline
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    /// Multipart request carried no `image` field
    #[error("No file part")]
    MissingFile,

    /// File part had no filename, or it sanitized down to nothing
    #[error("No selected file")]
    EmptyFilename,

    /// Extension is not on the allowed list
    #[error("Invalid file type")]
    DisallowedExtension,

    /// Multipart body could not be decoded
    #[error("Malformed multipart body: {0}")]
    Multipart(String),

    /// Storage provider call failed; the caller falls back to local disk
    #[error("Provider error: {0}")]
    Provider(String),

    /// Local disk write failed
    #[error("Local storage error: {0}")]
    Io(String),
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Provider(err.to_string())
    }
}
