//! Remote store abstraction and the Dropbox implementation.
//!
//! The backup engine needs exactly one operation from the remote side:
//! upload bytes to a remote path, replacing whatever is already there.
//! The trait is mockable so the traversal logic can be tested without
//! network access.

use async_trait::async_trait;
use mockall::automock;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Dropbox content endpoint for single-call uploads.
const UPLOAD_URL: &str = "https://content.dropboxapi.com/2/files/upload";

#[derive(Debug, Error)]
pub enum RemoteStoreError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to encode upload arguments: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("remote store rejected upload with status {status}: {body}")]
    Api { status: StatusCode, body: String },
}

/// Object storage the backup engine writes to.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Upload `content` to `remote_path`, overwriting any existing object
    /// at that path. Never renames or merges.
    async fn upload(&self, content: Vec<u8>, remote_path: &str) -> Result<(), RemoteStoreError>;
}

/// Commit metadata sent alongside every upload.
#[derive(Serialize)]
struct CommitInfo<'a> {
    path: &'a str,
    mode: &'a str,
    autorename: bool,
    mute: bool,
}

/// Dropbox HTTP API client holding the bearer token for the run.
pub struct DropboxClient {
    http: reqwest::Client,
    token: String,
}

impl DropboxClient {
    pub fn new(token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
        }
    }

    fn upload_arg(remote_path: &str) -> Result<String, serde_json::Error> {
        serde_json::to_string(&CommitInfo {
            path: remote_path,
            mode: "overwrite",
            autorename: false,
            mute: false,
        })
    }
}

#[async_trait]
impl RemoteStore for DropboxClient {
    async fn upload(&self, content: Vec<u8>, remote_path: &str) -> Result<(), RemoteStoreError> {
        debug!(remote_path, bytes = content.len(), "uploading object");

        let arg = Self::upload_arg(remote_path)?;
        let resp = self
            .http
            .post(UPLOAD_URL)
            .bearer_auth(&self.token)
            .header("Dropbox-API-Arg", arg)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(content)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(RemoteStoreError::Api { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_arg_requests_overwrite_without_autorename() {
        let arg = DropboxClient::upload_arg("/backups/etc/hosts").unwrap();
        let value: serde_json::Value = serde_json::from_str(&arg).unwrap();
        assert_eq!(value["path"], "/backups/etc/hosts");
        assert_eq!(value["mode"], "overwrite");
        assert_eq!(value["autorename"], false);
        assert_eq!(value["mute"], false);
    }
}
