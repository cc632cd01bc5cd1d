//! Error types for VxSDK

use thiserror::Error;

use crate::result::ResultCode;

/// Result type alias using VxSDK Error
pub type Result<T> = std::result::Result<T, Error>;

/// VxSDK error types
///
/// Every variant maps onto a [`ResultCode`] through [`Error::code`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Server returned {code}: {message}")]
    Server { code: ResultCode, message: String },

    #[error("Communication failure: {0}")]
    Communication(String),

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        field: String,
        reason: String,
        code: ResultCode,
    },

    #[error("Insufficient size: {needed} items needed, {available} available")]
    InsufficientSize { needed: usize, available: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Server error carrying only a code
    pub fn server(code: ResultCode) -> Self {
        Error::Server {
            code,
            message: code.as_str().to_string(),
        }
    }

    /// Local validation failure reported as `InvalidValue`
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidValue {
            field: field.into(),
            reason: reason.into(),
            code: ResultCode::InvalidValue,
        }
    }

    /// Local validation failure with a specific code
    pub fn rejected(field: impl Into<String>, code: ResultCode, reason: impl Into<String>) -> Self {
        Error::InvalidValue {
            field: field.into(),
            reason: reason.into(),
            code,
        }
    }

    /// The shared result code for this error
    pub fn code(&self) -> ResultCode {
        match self {
            Error::Server { code, .. } => *code,
            Error::Communication(_) => ResultCode::CommunicationFailure,
            Error::Timeout { .. } => ResultCode::Timeout,
            Error::Serialization(_) => ResultCode::MalformedResponse,
            Error::InvalidValue { code, .. } => *code,
            Error::InsufficientSize { .. } => ResultCode::InsufficientSize,
            Error::InvalidConfig(_) => ResultCode::InvalidParameters,
            Error::Io(_) => ResultCode::Unknown,
        }
    }
}

impl From<ResultCode> for Error {
    fn from(code: ResultCode) -> Self {
        Error::server(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::server(ResultCode::NotFound).code(), ResultCode::NotFound);
        assert_eq!(Error::Timeout { seconds: 5 }.code(), ResultCode::Timeout);
        assert_eq!(Error::invalid("name", "too long").code(), ResultCode::InvalidValue);
        assert_eq!(
            Error::rejected("name", ResultCode::ReadOnly, "read-only").code(),
            ResultCode::ReadOnly
        );
        assert_eq!(
            Error::InsufficientSize { needed: 4, available: 2 }.code(),
            ResultCode::InsufficientSize
        );
    }

    #[test]
    fn test_bad_json_maps_to_malformed_response() {
        let err: Error = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert_eq!(err.code(), ResultCode::MalformedResponse);
    }
}
