//! Value objects: plain payload structs with value semantics.
//!
//! Owned arrays are `Vec`s, so a `clone()` always duplicates element
//! storage and the length of an array can never drift from its contents.

use serde::{Deserialize, Serialize};

use crate::bounded::{Description, Id, Name, Timestamp};
use crate::error::{Error, Result};
use crate::result::ResultCode;
use crate::types::Protocol;

/// Deep-copyable payload with a canonical empty state
pub trait ValueObject: Clone + Default + PartialEq {
    /// Reset every field to its default.
    ///
    /// Afterwards the value equals `Self::default()`.
    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Video resolution in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl ValueObject for Resolution {}

/// Closed interval between two wire timestamps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeRange {
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

impl TimeRange {
    pub fn new(start_time: Timestamp, end_time: Timestamp) -> Self {
        Self { start_time, end_time }
    }

    /// Reject a range whose end precedes its start.
    ///
    /// Ranges with an unparsable or empty bound are left to the server.
    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start_time.parse_utc(), self.end_time.parse_utc()) {
            if end < start {
                return Err(Error::rejected(
                    "timeRange",
                    ResultCode::InvalidTimeRange,
                    "end time precedes start time",
                ));
            }
        }
        Ok(())
    }
}

impl ValueObject for TimeRange {}

/// One cell of a monitor layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorCell {
    pub index: u32,
    pub data_source_id: Id,
    pub is_live: bool,
    pub playback_time: Timestamp,
}

impl ValueObject for MonitorCell {}

/// Recorded span of a data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Clip {
    pub data_source_id: Id,
    pub data_storage_id: Id,
    pub time_range: TimeRange,
}

impl ValueObject for Clip {}

/// Network endpoint a device is reached on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceEndpoint {
    pub protocol: Protocol,
    pub host: Description,
    pub port: u16,
    pub path: Description,
}

impl ValueObject for DeviceEndpoint {}

/// Column of a report template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportField {
    pub name: Name,
    pub label: Name,
    pub is_visible: bool,
}

impl ValueObject for ReportField {}

/// Server password rules, checked locally by [`crate::payloads::NewUser::validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordPolicy {
    pub min_length: u32,
    /// Zero means unbounded
    pub max_length: u32,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_number: bool,
    pub require_special: bool,
    pub disallow_username: bool,
    pub history_count: u32,
}

impl ValueObject for PasswordPolicy {}

/// Key/value pair attached to rule responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub key: Name,
    pub value: Description,
}

impl ValueObject for Parameter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_clear_is_default<T: ValueObject + std::fmt::Debug>(mut value: T) {
        value.clear();
        assert_eq!(value, T::default());
    }

    #[test]
    fn test_resolution_clear() {
        let mut res = Resolution::new(1920, 1080);
        res.clear();
        assert_eq!(res, Resolution { width: 0, height: 0 });
    }

    #[test]
    fn test_clear_equals_default() {
        assert_clear_is_default(TimeRange::new(
            "2024-01-01T00:00:00Z".parse().unwrap(),
            "2024-01-02T00:00:00Z".parse().unwrap(),
        ));
        assert_clear_is_default(MonitorCell {
            index: 3,
            data_source_id: "ds-1".parse().unwrap(),
            is_live: true,
            playback_time: Timestamp::default(),
        });
        assert_clear_is_default(DeviceEndpoint {
            protocol: Protocol::Rtsp,
            host: "10.0.0.5".parse().unwrap(),
            port: 554,
            path: "/stream1".parse().unwrap(),
        });
        assert_clear_is_default(PasswordPolicy {
            min_length: 8,
            require_number: true,
            ..Default::default()
        });
    }

    #[test]
    fn test_time_range_validate() {
        let backwards = TimeRange::new(
            "2024-01-02T00:00:00Z".parse().unwrap(),
            "2024-01-01T00:00:00Z".parse().unwrap(),
        );
        assert_eq!(backwards.validate().unwrap_err().code(), ResultCode::InvalidTimeRange);

        let open_ended = TimeRange::new("2024-01-02T00:00:00Z".parse().unwrap(), Timestamp::default());
        assert!(open_ended.validate().is_ok());
    }

    #[test]
    fn test_wire_field_names() {
        let cell = MonitorCell {
            index: 1,
            data_source_id: "ds".parse().unwrap(),
            is_live: true,
            playback_time: Timestamp::default(),
        };
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["dataSourceId"], "ds");
        assert_eq!(json["isLive"], true);
    }
}
