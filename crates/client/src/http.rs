//! reqwest-backed transport

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, trace};

use vxsdk_common::{Error, Result};

use crate::config::{ClientConfig, Credentials};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

/// Transport speaking JSON over HTTP(S)
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: url::Url,
    credentials: Credentials,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let timeout = Duration::from_secs(config.timeout_secs);
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url()?,
            credentials: config.credentials.clone(),
            timeout,
        })
    }

    fn url_for(&self, path: &str) -> Result<url::Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::invalid("path", format!("'{}': {}", path, e)))
    }

    fn map_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            Error::Communication(e.to_string())
        }
    }
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path)?;
        debug!(method = %request.method, %url, "sending request");
        if let Some(body) = &request.body {
            trace!(%body, "request body");
        }

        let mut builder = self
            .http_client
            .request(to_reqwest(request.method), url)
            .header(reqwest::header::ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &self.credentials {
            Credentials::None => builder,
            Credentials::Basic { username, password } => builder.basic_auth(username, Some(password)),
            Credentials::Bearer { token } => builder.bearer_auth(token),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.map_err(|e| self.map_error(e))?;
        debug!(status, len = bytes.len(), "received response");

        let body = if bytes.is_empty() {
            None
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                // Error pages are often plain text; only successful bodies must be JSON.
                Err(_) if !(200..300).contains(&status) => {
                    Some(serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()))
                }
                Err(e) => return Err(e.into()),
            }
        };

        Ok(ApiResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join_keeps_api_prefix() {
        let transport = HttpTransport::new(&ClientConfig {
            base_url: "https://vms.local/api".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            transport.url_for("monitors/7").unwrap().as_str(),
            "https://vms.local/api/monitors/7"
        );
        assert_eq!(
            transport.url_for("/configuration/auth").unwrap().as_str(),
            "https://vms.local/api/configuration/auth"
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        let result = HttpTransport::new(&ClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
