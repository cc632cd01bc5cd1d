//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use vxsdk_common::{Error, Result};

/// How requests authenticate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credentials {
    #[default]
    None,
    Basic { username: String, password: String },
    Bearer { token: String },
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root URL of the REST API, e.g. `https://vms.example.com/api/`
    pub base_url: String,

    #[serde(default)]
    pub credentials: Credentials,

    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Accept self-signed server certificates
    #[serde(default)]
    pub accept_invalid_certs: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("vxsdk-rs/{}", vxsdk_common::VERSION)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://127.0.0.1/api/".to_string(),
            credentials: Credentials::None,
            timeout_secs: default_timeout(),
            accept_invalid_certs: false,
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| Error::InvalidConfig(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override fields from `VX_BASE_URL`, `VX_TOKEN`, `VX_USERNAME` and `VX_PASSWORD`
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("VX_BASE_URL") {
            self.base_url = url;
        }
        if let Some(token) = var("VX_TOKEN") {
            self.credentials = Credentials::Bearer { token };
        } else if let Some(username) = var("VX_USERNAME") {
            self.credentials = Credentials::Basic {
                username,
                password: var("VX_PASSWORD").unwrap_or_default(),
            };
        }
    }

    /// Parsed base URL, normalized to end with `/`
    pub fn base_url(&self) -> Result<url::Url> {
        let mut raw = self.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = url::Url::parse(&raw)
            .map_err(|e| Error::InvalidConfig(format!("base_url '{}': {}", self.base_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::InvalidConfig(format!("unsupported scheme '{}'", other))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.timeout_secs == 0 {
            return Err(Error::InvalidConfig("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
