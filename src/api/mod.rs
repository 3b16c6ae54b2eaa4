// Remote service boundary - everything the pipeline needs from the
// social-media API, behind one object-safe trait so tests can substitute
// a recording double for the wire client.

pub mod http;
pub mod oauth;

use async_trait::async_trait;

use crate::errors::AppResult;

pub use http::ApiClient;

/// Long-lived user credentials, either taken from configuration or obtained
/// through the PIN exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCredentials {
    pub token: String,
    pub secret: String,
}

/// First half of the PIN flow: where to send the user, and the temporary
/// request token the exchange must reference.
#[derive(Debug, Clone)]
pub struct AuthenticationRequest {
    pub authorization_url: String,
    pub request_token: AccessCredentials,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub name: String,
}

/// Opaque media handle returned by the upload endpoint. A post may only
/// reference it when both flags are set.
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    pub media_id: String,
    pub uploaded: bool,
    pub ready_to_use: bool,
}

impl UploadedMedia {
    pub fn is_usable(&self) -> bool {
        self.uploaded && self.ready_to_use
    }
}

#[derive(Debug, Clone)]
pub struct PublishedStatus {
    pub id: String,
}

#[async_trait]
pub trait SocialApi: Send + Sync {
    /// Starts the PIN flow by requesting a temporary token and the
    /// authorization URL the user must visit.
    async fn request_authentication(&self) -> AppResult<AuthenticationRequest>;

    /// Exchanges the user-supplied PIN for long-lived access credentials.
    async fn exchange_pin(
        &self,
        request: &AuthenticationRequest,
        pin: &str,
    ) -> AppResult<AccessCredentials>;

    /// Fetches the account the credentials belong to.
    async fn verify_credentials(&self, credentials: &AccessCredentials) -> AppResult<Account>;

    /// Uploads raw image bytes and returns the media handle.
    async fn upload_media(
        &self,
        credentials: &AccessCredentials,
        bytes: Vec<u8>,
    ) -> AppResult<UploadedMedia>;

    /// Publishes a status with the given text and attached media.
    async fn publish_status(
        &self,
        credentials: &AccessCredentials,
        text: &str,
        media_id: &str,
    ) -> AppResult<PublishedStatus>;
}
