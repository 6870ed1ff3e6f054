//! Infisical secret retrieval.
//!
//! The Dropbox token can live in Infisical instead of the local config
//! file. Resolution is two calls: a universal-auth login trading the
//! machine identity for a short-lived API token, then a raw secret read.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::config::InfisicalConfig;

pub const DEFAULT_SITE_URL: &str = "https://app.infisical.com";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("transport error talking to the secret manager: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to authenticate with Infisical (status {status}): {body}")]
    Auth { status: StatusCode, body: String },
    #[error("failed to retrieve the access token from Infisical (status {status}): {body}")]
    Retrieve { status: StatusCode, body: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    secret: RawSecret,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSecret {
    secret_value: String,
}

/// Minimal Infisical REST client.
pub struct InfisicalClient {
    http: reqwest::Client,
    site_url: String,
}

impl InfisicalClient {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            site_url: site_url.into(),
        }
    }

    /// Log in with universal auth and read the secret `config.key_path`
    /// points at, returning its value.
    pub async fn fetch_access_token(
        &self,
        config: &InfisicalConfig,
    ) -> Result<String, CredentialError> {
        let api_token = self.universal_auth_login(config).await?;

        let (secret_path, secret_key) = split_key_path(&config.key_path);
        info!(secret_key, secret_path, "retrieving access token from Infisical");

        let resp = self
            .http
            .get(format!(
                "{}/api/v3/secrets/raw/{}",
                self.site_url, secret_key
            ))
            .bearer_auth(api_token)
            .query(&[
                ("workspaceId", config.project_id.as_str()),
                ("environment", config.environment.as_str()),
                ("secretPath", secret_path),
                ("type", config.secret_type.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            error!(%status, "secret retrieval failed");
            return Err(CredentialError::Retrieve { status, body });
        }

        let retrieved: RetrieveResponse = resp.json().await?;
        Ok(retrieved.secret.secret_value)
    }

    async fn universal_auth_login(
        &self,
        config: &InfisicalConfig,
    ) -> Result<String, CredentialError> {
        let resp = self
            .http
            .post(format!(
                "{}/api/v1/auth/universal-auth/login",
                self.site_url
            ))
            .json(&serde_json::json!({
                "clientId": config.client_id,
                "clientSecret": config.client_secret,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            error!(%status, "Infisical universal-auth login failed");
            return Err(CredentialError::Auth { status, body });
        }

        let login: LoginResponse = resp.json().await?;
        Ok(login.access_token)
    }
}

/// Split a secret key path into its folder path and final key segment.
/// A path with no folder component reads from the root folder `/`.
fn split_key_path(key_path: &str) -> (&str, &str) {
    let trimmed = key_path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some(("", key)) => ("/", key),
        Some((dir, key)) => (dir, key),
        None => ("/", trimmed),
    }
}
