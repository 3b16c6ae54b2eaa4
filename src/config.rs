use std::env;
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};

const DEFAULT_API_BASE_URL: &str = "https://api.twitter.com";
const DEFAULT_UPLOAD_BASE_URL: &str = "https://upload.twitter.com";
const LOG_FILE: &str = "log.txt";

/// Run configuration, read once from the environment and immutable for the
/// process lifetime. Validation is deferred to the pipeline so that every
/// run starts by writing to the log file, even a misconfigured one.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    pub image_directory: String,
    pub log_file: PathBuf,
    pub api_base_url: String,
    pub upload_base_url: String,
}

impl RunConfig {
    pub fn from_env() -> Self {
        let var = |key: &str| env::var(key).unwrap_or_default();

        Self {
            consumer_key: var("CONSUMER_KEY"),
            consumer_secret: var("CONSUMER_SECRET"),
            access_token: var("ACCESS_TOKEN"),
            access_token_secret: var("ACCESS_TOKEN_SECRET"),
            image_directory: var("IMAGE_DIRECTORY"),
            log_file: PathBuf::from(LOG_FILE),
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            upload_base_url: env::var("UPLOAD_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_BASE_URL.to_string()),
        }
    }

    /// Checks the required settings in a fixed order; the first missing one
    /// wins, there is no aggregation of multiple errors.
    pub fn validate(&self) -> AppResult<()> {
        if self.consumer_key.trim().is_empty() {
            return Err(AppError::config("API consumer key"));
        }
        if self.consumer_secret.trim().is_empty() {
            return Err(AppError::config("API consumer secret"));
        }
        if self.image_directory.trim().is_empty() {
            return Err(AppError::config("image directory"));
        }
        Ok(())
    }

    /// Whether a complete access token pair was supplied, making the
    /// interactive PIN flow unnecessary.
    pub fn has_access_credentials(&self) -> bool {
        !self.access_token.trim().is_empty() && !self.access_token_secret.trim().is_empty()
    }
}
