//! Length-checked strings matching the server's fixed-size text fields.
//!
//! A field declared as `N` bytes on the server holds at most `N - 1` bytes
//! of text. The bound is enforced when the value is built or deserialized,
//! never later.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Upper bound for long-form identifiers
pub const MAX_UUID_LENGTH: usize = 1024;

/// Upper bound for situation (event) type names
pub const MAX_SITUATION_TYPE_LENGTH: usize = 128;

/// A string of at most `N - 1` bytes
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoundedString<const N: usize>(String);

impl<const N: usize> BoundedString<N> {
    /// Maximum text length in bytes
    pub const MAX_LEN: usize = N - 1;

    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() > Self::MAX_LEN {
            return Err(Error::invalid(
                "string",
                format!("{} bytes exceeds limit of {}", value.len(), Self::MAX_LEN),
            ));
        }
        Ok(Self(value))
    }

    /// Same as [`BoundedString::new`] but names the offending field in the error
    pub fn for_field(field: &str, value: impl Into<String>) -> Result<Self> {
        Self::new(value).map_err(|e| match e {
            Error::InvalidValue { reason, code, .. } => Error::InvalidValue {
                field: field.to_string(),
                reason,
                code,
            },
            other => other,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl<const N: usize> Deref for BoundedString<N> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> AsRef<str> for BoundedString<N> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> fmt::Display for BoundedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const N: usize> fmt::Debug for BoundedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<const N: usize> FromStr for BoundedString<N> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl<const N: usize> TryFrom<&str> for BoundedString<N> {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl<const N: usize> TryFrom<String> for BoundedString<N> {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl<const N: usize> PartialEq<str> for BoundedString<N> {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl<const N: usize> PartialEq<&str> for BoundedString<N> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<const N: usize> Serialize for BoundedString<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, const N: usize> Deserialize<'de> for BoundedString<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Server-assigned resource identifier
pub type Id = BoundedString<64>;

/// Long-form identifier
pub type LongId = BoundedString<MAX_UUID_LENGTH>;

/// Human-readable name
pub type Name = BoundedString<64>;

/// Free text
pub type Description = BoundedString<256>;

/// Wire timestamp, kept as text
pub type Timestamp = BoundedString<64>;

/// Situation (event) type name
pub type SituationType = BoundedString<MAX_SITUATION_TYPE_LENGTH>;

impl BoundedString<64> {
    /// Parse as an RFC 3339 instant.
    ///
    /// The SDK itself never validates timestamps; this is for callers.
    pub fn parse_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::parse_from_rfc3339(&self.0)
            .ok()
            .map(|t| t.with_timezone(&chrono::Utc))
    }

    pub fn from_utc(time: chrono::DateTime<chrono::Utc>) -> Self {
        // RFC 3339 with seconds precision is always well under 63 bytes
        Self(time.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ResultCode;

    #[test]
    fn test_length_bound() {
        let ok = Name::new("a".repeat(63)).unwrap();
        assert_eq!(ok.len(), 63);

        let err = Name::new("a".repeat(64)).unwrap_err();
        assert_eq!(err.code(), ResultCode::InvalidValue);
    }

    #[test]
    fn test_for_field_names_the_field() {
        match Name::for_field("name", "x".repeat(100)) {
            Err(Error::InvalidValue { field, .. }) => assert_eq!(field, "name"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_rejects_overlong() {
        let long = format!("\"{}\"", "z".repeat(80));
        assert!(serde_json::from_str::<Id>(&long).is_err());
        let id: Id = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(id, "abc");
    }

    #[test]
    fn test_timestamp_parse() {
        let ts = Timestamp::new("2024-03-01T12:00:00Z").unwrap();
        let parsed = ts.parse_utc().unwrap();
        assert_eq!(Timestamp::from_utc(parsed), ts);
        assert!(Timestamp::new("yesterday").unwrap().parse_utc().is_none());
    }
}
