//! Transport boundary between resource handles and the server.
//!
//! Handles build [`ApiRequest`]s and hand them to a [`Transport`]. The
//! transport owns connection handling, authentication and timeouts.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;

use vxsdk_common::{Error, Result, ResultCode};

/// HTTP verb of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One request against the REST API, relative to the server root
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path without leading slash, e.g. `monitors/42`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::Patch, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw response: status code plus optional JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<serde_json::Value>,
}

/// Error body the server attaches to failed requests
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<ResultCode>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiResponse {
    pub fn new(status: u16, body: Option<serde_json::Value>) -> Self {
        Self { status, body }
    }

    pub fn ok(body: serde_json::Value) -> Self {
        Self::new(200, Some(body))
    }

    pub fn no_content() -> Self {
        Self::new(204, None)
    }

    /// Error response in the server's `{code, message}` form
    pub fn error(status: u16, code: ResultCode) -> Self {
        Self::new(
            status,
            Some(serde_json::json!({ "code": code, "message": code.as_str() })),
        )
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into `Error::Server`.
    ///
    /// The code comes from the error body when present and recognised,
    /// else from the HTTP status.
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let parsed = self
            .body
            .as_ref()
            .and_then(|b| serde_json::from_value::<ErrorBody>(b.clone()).ok());
        let (code, message) = match parsed {
            Some(ErrorBody { code, message }) => (
                code.filter(|c| *c != ResultCode::Unknown)
                    .unwrap_or_else(|| ResultCode::from_http_status(self.status)),
                message,
            ),
            None => (ResultCode::from_http_status(self.status), None),
        };

        Err(Error::Server {
            code,
            message: message.unwrap_or_else(|| format!("HTTP {}", self.status)),
        })
    }

    /// Decode the body of a successful response
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.into_result()?.body.unwrap_or(serde_json::Value::Null);
        Ok(serde_json::from_value(body)?)
    }
}

/// Pluggable request executor
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the raw response.
    ///
    /// Only transport-level failures are errors here; HTTP error statuses
    /// come back as responses.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}
