use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required setting: {field}")]
    Config { field: String },

    #[error("Could not obtain access credentials: {reason}")]
    AuthConstruction { reason: String },

    #[error("Could not verify the authenticated account: {reason}")]
    AuthVerification { reason: String },

    #[error("No images found in directory: {directory}")]
    NoImageFound { directory: String },

    #[error("Upload failed: {reason}")]
    Upload { reason: String },

    #[error("Post failed: {reason}")]
    Post { reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Custom result type
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn config(field: &str) -> Self {
        Self::Config {
            field: field.to_string(),
        }
    }

    pub fn auth_construction(reason: impl Into<String>) -> Self {
        Self::AuthConstruction {
            reason: reason.into(),
        }
    }

    pub fn auth_verification(reason: impl Into<String>) -> Self {
        Self::AuthVerification {
            reason: reason.into(),
        }
    }

    pub fn no_image_found(directory: &str) -> Self {
        Self::NoImageFound {
            directory: directory.to_string(),
        }
    }

    pub fn upload(reason: impl Into<String>) -> Self {
        Self::Upload {
            reason: reason.into(),
        }
    }

    pub fn post(reason: impl Into<String>) -> Self {
        Self::Post {
            reason: reason.into(),
        }
    }
}
