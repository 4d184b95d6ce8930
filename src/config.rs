//! Configuration management for athena-frames.
//!
//! Handles loading configuration from TOML files and environment variables:
//! where the query proxy lives, which datasource to address, and the
//! datasource's plain (non-secret) settings.

use crate::error::{FramesError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Main configuration structure for athena-frames.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Query proxy endpoint.
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Datasource settings as stored by the host.
    #[serde(default)]
    pub settings: Settings,
}

/// Where and how to reach the query proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the proxy (e.g. "http://localhost:3000").
    pub url: Option<String>,

    /// Numeric id of the datasource, attached to every query.
    pub datasource_id: Option<i64>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: None,
            datasource_id: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EndpointConfig {
    /// Returns the validated base URL.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self
            .url
            .as_deref()
            .ok_or_else(|| FramesError::config("Endpoint url is required"))?;
        let url =
            Url::parse(raw).map_err(|e| FramesError::config(format!("Invalid endpoint url: {e}")))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(FramesError::config(format!(
                "Invalid scheme '{}'. Expected 'http' or 'https'",
                url.scheme()
            )));
        }
        Ok(url)
    }

    /// Returns the datasource id or a configuration error.
    pub fn datasource_id(&self) -> Result<i64> {
        self.datasource_id
            .ok_or_else(|| FramesError::config("Endpoint datasource_id is required"))
    }

    /// Applies environment variables as defaults for unset values.
    pub fn apply_env_defaults(&mut self) {
        if self.url.is_none() {
            self.url = std::env::var("ATHENA_FRAMES_URL").ok();
        }
        if self.datasource_id.is_none() {
            if let Ok(id) = std::env::var("ATHENA_FRAMES_DATASOURCE_ID") {
                self.datasource_id = id.parse().ok();
            }
        }
    }
}

/// How the datasource authenticates against AWS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthType {
    #[default]
    Static,
    RoleArn,
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "Static"),
            Self::RoleArn => write!(f, "RoleArn"),
        }
    }
}

/// Plain datasource settings. The secret access key never lives here.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub auth_type: AuthType,

    pub access_key: Option<String>,

    pub region: Option<String>,

    pub work_group: Option<String>,

    /// Required when `auth_type` is `RoleArn`.
    pub role_arn: Option<String>,
}

impl Settings {
    /// Applies `AWS_REGION` and `ATHENA_WORK_GROUP` as defaults.
    pub fn apply_env_defaults(&mut self) {
        if self.region.is_none() {
            self.region = std::env::var("AWS_REGION").ok();
        }
        if self.work_group.is_none() {
            self.work_group = std::env::var("ATHENA_WORK_GROUP").ok();
        }
    }

    /// Checks the settings for combinations the backend cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.region.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Err(FramesError::config("region must not be empty"));
        }
        if self.auth_type == AuthType::RoleArn
            && self.role_arn.as_deref().map_or(true, |arn| arn.trim().is_empty())
        {
            return Err(FramesError::config(
                "role_arn is required when auth_type is RoleArn",
            ));
        }
        Ok(())
    }

    /// Returns a display-safe summary for logs.
    pub fn display_string(&self) -> String {
        let region = self.region.as_deref().unwrap_or("default region");
        let work_group = self.work_group.as_deref().unwrap_or("primary");
        format!("{work_group} @ {region} ({})", self.auth_type)
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("athena-frames")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| FramesError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            FramesError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies environment defaults to every section.
    pub fn apply_env_defaults(&mut self) {
        self.endpoint.apply_env_defaults();
        self.settings.apply_env_defaults();
    }
}
