use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{multipart, Client};
use serde::Deserialize;

use crate::config::RunConfig;
use crate::errors::{AppError, AppResult};

use super::oauth::{self, SigningKeys};
use super::{
    AccessCredentials, Account, AuthenticationRequest, PublishedStatus, SocialApi, UploadedMedia,
};

/// Wire client for the v1.1 REST API. Holds the consumer key pair; user
/// credentials are passed per call so the same client serves both the PIN
/// flow and the authenticated endpoints.
pub struct ApiClient {
    client: Client,
    api_base: String,
    upload_base: String,
    consumer_key: String,
    consumer_secret: String,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    id_str: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    media_id_string: String,
    processing_info: Option<ProcessingInfo>,
}

#[derive(Debug, Deserialize)]
struct ProcessingInfo {
    #[serde(default)]
    state: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    id_str: String,
}

impl ApiClient {
    pub fn new(config: &RunConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base_url.trim_end_matches('/').to_string(),
            upload_base: config.upload_base_url.trim_end_matches('/').to_string(),
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
        })
    }

    fn keys<'a>(&'a self, credentials: Option<&'a AccessCredentials>) -> SigningKeys<'a> {
        SigningKeys {
            consumer_key: &self.consumer_key,
            consumer_secret: &self.consumer_secret,
            token: credentials.map(|c| c.token.as_str()),
            token_secret: credentials.map(|c| c.secret.as_str()),
        }
    }

    async fn error_body(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        format!("API error {}: {}", status, body)
    }
}

/// Token endpoints answer with a form-encoded body; pull out the
/// `oauth_token` / `oauth_token_secret` pair.
fn parse_token_response(body: &str) -> Option<AccessCredentials> {
    let mut token = None;
    let mut secret = None;

    for pair in body.split('&') {
        let mut parts = pair.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some("oauth_token"), Some(value)) => token = Some(value.to_string()),
            (Some("oauth_token_secret"), Some(value)) => secret = Some(value.to_string()),
            _ => {}
        }
    }

    Some(AccessCredentials {
        token: token?,
        secret: secret?,
    })
}

#[async_trait]
impl SocialApi for ApiClient {
    async fn request_authentication(&self) -> AppResult<AuthenticationRequest> {
        let url = format!("{}/oauth/request_token", self.api_base);
        let header = oauth::authorization_header(
            "POST",
            &url,
            self.keys(None),
            &[("oauth_callback", "oob")],
            &[],
        );

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, header)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::auth_construction(Self::error_body(response).await));
        }

        let body = response.text().await?;
        let request_token = parse_token_response(&body).ok_or_else(|| {
            AppError::auth_construction("request token response is missing the token pair")
        })?;

        let authorization_url = format!(
            "{}/oauth/authorize?oauth_token={}",
            self.api_base,
            oauth::percent_encode(&request_token.token)
        );
        log::debug!("Obtained request token for {}", authorization_url);

        Ok(AuthenticationRequest {
            authorization_url,
            request_token,
        })
    }

    async fn exchange_pin(
        &self,
        request: &AuthenticationRequest,
        pin: &str,
    ) -> AppResult<AccessCredentials> {
        let url = format!("{}/oauth/access_token", self.api_base);
        let header = oauth::authorization_header(
            "POST",
            &url,
            self.keys(Some(&request.request_token)),
            &[("oauth_verifier", pin)],
            &[],
        );

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, header)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::auth_construction(Self::error_body(response).await));
        }

        let body = response.text().await?;
        parse_token_response(&body).ok_or_else(|| {
            AppError::auth_construction("access token response is missing the token pair")
        })
    }

    async fn verify_credentials(&self, credentials: &AccessCredentials) -> AppResult<Account> {
        let url = format!("{}/1.1/account/verify_credentials.json", self.api_base);
        let header =
            oauth::authorization_header("GET", &url, self.keys(Some(credentials)), &[], &[]);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, header)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::auth_verification(Self::error_body(response).await));
        }

        let account: VerifyResponse = response.json().await?;
        Ok(Account {
            id: account.id_str,
            name: account.name,
        })
    }

    async fn upload_media(
        &self,
        credentials: &AccessCredentials,
        bytes: Vec<u8>,
    ) -> AppResult<UploadedMedia> {
        let url = format!("{}/1.1/media/upload.json", self.upload_base);
        // Multipart bodies are excluded from the signature base string.
        let header =
            oauth::authorization_header("POST", &url, self.keys(Some(credentials)), &[], &[]);

        let part = multipart::Part::bytes(bytes)
            .file_name("image.jpg")
            .mime_str("image/jpeg")?;
        let form = multipart::Form::new().part("media", part);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, header)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::upload(Self::error_body(response).await));
        }

        let upload: UploadResponse = response.json().await?;
        let uploaded = !upload.media_id_string.is_empty();
        let ready_to_use = match &upload.processing_info {
            Some(info) => info.state == "succeeded",
            None => true,
        };

        log::info!(
            "Uploaded media {} (ready: {})",
            upload.media_id_string,
            ready_to_use
        );

        Ok(UploadedMedia {
            media_id: upload.media_id_string,
            uploaded,
            ready_to_use,
        })
    }

    async fn publish_status(
        &self,
        credentials: &AccessCredentials,
        text: &str,
        media_id: &str,
    ) -> AppResult<PublishedStatus> {
        let url = format!("{}/1.1/statuses/update.json", self.api_base);
        let params = [("status", text), ("media_ids", media_id)];
        let header =
            oauth::authorization_header("POST", &url, self.keys(Some(credentials)), &[], &params);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, header)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::post(Self::error_body(response).await));
        }

        let status: StatusResponse = response.json().await?;
        Ok(PublishedStatus { id: status.id_str })
    }
}
