//! Result codes shared by every remote operation.
//!
//! The server reports failures as a snake_case code name. Each code belongs
//! to one [`ResultCategory`] so callers can branch on the broad kind of
//! failure without matching every variant.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Broad grouping of result codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCategory {
    Success,
    Transport,
    Authorization,
    Licensing,
    Validation,
    State,
    Other,
}

macro_rules! result_codes {
    ($($variant:ident => $wire:literal, $category:ident;)+) => {
        /// Outcome of a remote-backed operation
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum ResultCode {
            $($variant,)+
            /// Code not recognized by this SDK version
            #[default]
            Unknown,
        }

        impl ResultCode {
            /// All codes except `Unknown`
            pub const ALL: &'static [ResultCode] = &[$(ResultCode::$variant,)+];

            /// Wire name of the code
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ResultCode::$variant => $wire,)+
                    ResultCode::Unknown => "unknown",
                }
            }

            pub fn category(&self) -> ResultCategory {
                match self {
                    $(ResultCode::$variant => ResultCategory::$category,)+
                    ResultCode::Unknown => ResultCategory::Other,
                }
            }
        }

        impl FromStr for ResultCode {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s {
                    $($wire => ResultCode::$variant,)+
                    _ => ResultCode::Unknown,
                })
            }
        }
    };
}

result_codes! {
    Ok => "ok", Success;

    // Transport and availability
    CommunicationFailure => "communication_failure", Transport;
    Timeout => "timeout", Transport;
    ServerError => "server_error", Transport;
    MalformedResponse => "malformed_response", Transport;
    TooManyRequests => "too_many_requests", Transport;
    CameraUnavailable => "camera_unavailable", Transport;
    StorageUnavailable => "storage_unavailable", Transport;
    DeviceUnavailable => "device_unavailable", Transport;
    StreamUnavailable => "stream_unavailable", Transport;
    ClusterUnavailable => "cluster_unavailable", Transport;
    DatabaseUnavailable => "database_unavailable", Transport;

    // Authentication and authorization
    Unauthenticated => "unauthenticated", Authorization;
    Unauthorized => "unauthorized", Authorization;
    AuthExpired => "auth_expired", Authorization;
    InvalidCredentials => "invalid_credentials", Authorization;
    InsufficientPrivileges => "insufficient_privileges", Authorization;
    AccountLocked => "account_locked", Authorization;
    AccountDisabled => "account_disabled", Authorization;
    PasswordExpired => "password_expired", Authorization;
    SessionLimitReached => "session_limit_reached", Authorization;

    // Licensing
    NoLicense => "no_license", Licensing;
    LicenseCountExceeded => "license_count_exceeded", Licensing;
    IncompatibleLicense => "incompatible_license", Licensing;
    LicenseExpired => "license_expired", Licensing;
    InvalidLicense => "invalid_license", Licensing;
    FeatureNotLicensed => "feature_not_licensed", Licensing;

    // Validation
    InvalidParameters => "invalid_parameters", Validation;
    InvalidValue => "invalid_value", Validation;
    MissingParameters => "missing_parameters", Validation;
    ReadOnly => "read_only", Validation;
    ValueOutOfRange => "value_out_of_range", Validation;
    InvalidTimeRange => "invalid_time_range", Validation;
    InsufficientSize => "insufficient_size", Validation;
    NameInUse => "name_in_use", Validation;
    NumberInUse => "number_in_use", Validation;
    UnsupportedValue => "unsupported_value", Validation;
    PasswordTooShort => "password_too_short", Validation;
    PasswordTooLong => "password_too_long", Validation;
    PasswordMissingUppercase => "password_missing_uppercase", Validation;
    PasswordMissingLowercase => "password_missing_lowercase", Validation;
    PasswordMissingNumber => "password_missing_number", Validation;
    PasswordMissingSpecial => "password_missing_special", Validation;
    PasswordReused => "password_reused", Validation;
    PasswordContainsUsername => "password_contains_username", Validation;

    // Resource state and conflicts
    NotFound => "not_found", State;
    AlreadyExists => "already_exists", State;
    Conflict => "conflict", State;
    ResourceLocked => "resource_locked", State;
    NotReady => "not_ready", State;
    HasDependents => "has_dependents", State;
    InUse => "in_use", State;
    Busy => "busy", State;
    LimitReached => "limit_reached", State;
    ActionUnavailable => "action_unavailable", State;
    ExportInProgress => "export_in_progress", State;
    NotCommissioned => "not_commissioned", State;

    // Other
    NotImplemented => "not_implemented", Other;
    Unsupported => "unsupported", Other;
}

impl ResultCode {
    pub fn is_success(&self) -> bool {
        matches!(self, ResultCode::Ok)
    }

    /// Whether repeating the same request might succeed.
    ///
    /// Informational only: the SDK itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ResultCode::CommunicationFailure
                | ResultCode::Timeout
                | ResultCode::TooManyRequests
                | ResultCode::NotReady
                | ResultCode::Busy
                | ResultCode::ResourceLocked
        )
    }

    /// Fallback mapping for error responses that carry no code body
    pub fn from_http_status(status: u16) -> Self {
        match status {
            200..=299 => ResultCode::Ok,
            400 => ResultCode::InvalidParameters,
            401 => ResultCode::Unauthenticated,
            403 => ResultCode::Unauthorized,
            404 => ResultCode::NotFound,
            408 => ResultCode::Timeout,
            409 => ResultCode::Conflict,
            423 => ResultCode::ResourceLocked,
            429 => ResultCode::TooManyRequests,
            501 => ResultCode::NotImplemented,
            503 => ResultCode::NotReady,
            500..=599 => ResultCode::ServerError,
            _ => ResultCode::Unknown,
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResultCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResultCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let code = raw.parse().unwrap_or_default();
        if code == ResultCode::Unknown && raw != "unknown" {
            tracing::warn!(code = %raw, "unrecognized result code");
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for code in ResultCode::ALL {
            let parsed: ResultCode = code.as_str().parse().unwrap();
            assert_eq!(parsed, *code);
        }
        assert!(ResultCode::ALL.len() >= 55);
    }

    #[test]
    fn test_unrecognized_code_is_unknown() {
        let code: ResultCode = serde_json::from_str("\"brand_new_failure\"").unwrap();
        assert_eq!(code, ResultCode::Unknown);
        assert_eq!(code.category(), ResultCategory::Other);
    }

    #[test]
    fn test_categories() {
        assert_eq!(ResultCode::Ok.category(), ResultCategory::Success);
        assert_eq!(ResultCode::CommunicationFailure.category(), ResultCategory::Transport);
        assert_eq!(ResultCode::AuthExpired.category(), ResultCategory::Authorization);
        assert_eq!(ResultCode::LicenseCountExceeded.category(), ResultCategory::Licensing);
        assert_eq!(ResultCode::PasswordTooShort.category(), ResultCategory::Validation);
        assert_eq!(ResultCode::ResourceLocked.category(), ResultCategory::State);
    }

    #[test]
    fn test_http_status_fallback() {
        assert_eq!(ResultCode::from_http_status(204), ResultCode::Ok);
        assert_eq!(ResultCode::from_http_status(401), ResultCode::Unauthenticated);
        assert_eq!(ResultCode::from_http_status(404), ResultCode::NotFound);
        assert_eq!(ResultCode::from_http_status(423), ResultCode::ResourceLocked);
        assert_eq!(ResultCode::from_http_status(502), ResultCode::ServerError);
        assert_eq!(ResultCode::from_http_status(302), ResultCode::Unknown);
    }

    #[test]
    fn test_serializes_as_wire_name() {
        let json = serde_json::to_string(&ResultCode::LicenseCountExceeded).unwrap();
        assert_eq!(json, "\"license_count_exceeded\"");
    }
}
