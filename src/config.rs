//! Application configuration and credential resolution.
//!
//! The config file lives in the platform config home
//! (`$XDG_CONFIG_HOME/boxup/config.json`, falling back to
//! `~/.config/boxup/config.json`) and is JWCC like the backup list. It
//! either carries a Dropbox access token directly or points at the
//! Infisical secret holding one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::secrets::{CredentialError, InfisicalClient, DEFAULT_SITE_URL};

pub const APPLICATION_NAME: &str = "boxup";
const CONFIG_FILENAME: &str = "config.json";

/// Application configuration.
///
/// A direct `access_token` comes from the Dropbox developer console
/// (App console > Settings > OAuth2 > Generated access token).
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub infisical: Option<InfisicalConfig>,
}

/// Universal-auth identity and the location of the Dropbox token secret.
#[derive(Debug, Clone, Deserialize)]
pub struct InfisicalConfig {
    pub client_id: String,
    pub client_secret: String,
    pub project_id: String,
    pub environment: String,
    pub secret_type: String,
    pub key_path: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to locate a home directory for the current user")]
    NoHome,
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },
    #[error("config declares neither an access token nor an Infisical section")]
    NoCredentialSource,
}

/// Where the Dropbox access token comes from.
#[derive(Debug)]
pub enum CredentialSource {
    /// Token written directly into the config file.
    Direct(String),
    /// Token held in Infisical, retrieved at startup.
    SecretManager(InfisicalConfig),
}

impl Config {
    /// Load the configuration from the platform config home.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path()?)
    }

    /// Load the configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "loading configuration");

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        json5::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pick the credential source, preferring a directly configured token.
    pub fn credential_source(&self) -> Result<CredentialSource, ConfigError> {
        match (&self.access_token, &self.infisical) {
            (Some(token), _) if !token.is_empty() => Ok(CredentialSource::Direct(token.clone())),
            (_, Some(infisical)) => Ok(CredentialSource::SecretManager(infisical.clone())),
            _ => Err(ConfigError::NoCredentialSource),
        }
    }
}

impl CredentialSource {
    /// Resolve the source into a bearer token. A direct token resolves
    /// without any network traffic.
    pub async fn resolve(&self) -> Result<String, CredentialError> {
        match self {
            CredentialSource::Direct(token) => Ok(token.clone()),
            CredentialSource::SecretManager(config) => {
                InfisicalClient::new(DEFAULT_SITE_URL)
                    .fetch_access_token(config)
                    .await
            }
        }
    }
}

/// Resolve `<config-home>/boxup/config.json`.
///
/// `$XDG_CONFIG_HOME` is honoured only when set to an absolute path, per
/// the XDG base directory spec; otherwise `~/.config` is used.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let config_home = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) if Path::new(&dir).is_absolute() => PathBuf::from(dir),
        _ => dirs::home_dir().ok_or(ConfigError::NoHome)?.join(".config"),
    };
    Ok(config_home.join(APPLICATION_NAME).join(CONFIG_FILENAME))
}
