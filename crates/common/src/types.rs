//! Closed enumerations used by resources and value objects.
//!
//! Every enumeration carries an explicit `Unknown` variant. It is the
//! default, it is what any unrecognized wire value decodes to, and setters
//! refuse to send it.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Enumerations with an `Unknown` sentinel
pub trait WireEnum: Copy + Default + PartialEq {
    fn as_str(&self) -> &'static str;

    fn is_known(&self) -> bool {
        *self != Self::default()
    }
}

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            $($variant,)+
            #[default]
            Unknown,
        }

        impl $name {
            pub const VARIANTS: &'static [$name] = &[$($name::$variant,)+];

            pub fn parse(s: &str) -> Self {
                match s {
                    $($wire => $name::$variant,)+
                    _ => $name::Unknown,
                }
            }
        }

        impl WireEnum for $name {
            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unknown => "unknown",
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok($name::parse(&raw))
            }
        }
    };
}

wire_enum! {
    /// Kind of physical or virtual device
    DeviceType {
        Camera => "camera",
        Encoder => "encoder",
        Decoder => "decoder",
        Recorder => "recorder",
        Server => "server",
        Workstation => "workstation",
        AccessControl => "accessControl",
        Generic => "generic",
    }
}

wire_enum! {
    /// Reachability of a device
    DeviceState {
        Online => "online",
        Offline => "offline",
        Unauthenticated => "unauthenticated",
        Upgrading => "upgrading",
        Warning => "warning",
    }
}

wire_enum! {
    /// Kind of media a data source produces
    DataSourceType {
        Video => "video",
        Audio => "audio",
        Metadata => "metadata",
        Input => "input",
        Output => "output",
    }
}

wire_enum! {
    DataSourceState {
        Online => "online",
        Offline => "offline",
        Recording => "recording",
        Disabled => "disabled",
    }
}

wire_enum! {
    /// Cell arrangement of a monitor
    MonitorLayout {
        Cell1x1 => "1x1",
        Cell1x2 => "1x2",
        Cell2x1 => "2x1",
        Cell2x2 => "2x2",
        Cell2x3 => "2x3",
        Cell3x2 => "3x2",
        Cell3x3 => "3x3",
        Cell4x3 => "4x3",
        Cell4x4 => "4x4",
        Cell5x5 => "5x5",
    }
}

impl MonitorLayout {
    /// Number of cells in the layout
    pub fn cell_count(&self) -> usize {
        match self {
            MonitorLayout::Cell1x1 => 1,
            MonitorLayout::Cell1x2 | MonitorLayout::Cell2x1 => 2,
            MonitorLayout::Cell2x2 => 4,
            MonitorLayout::Cell2x3 | MonitorLayout::Cell3x2 => 6,
            MonitorLayout::Cell3x3 => 9,
            MonitorLayout::Cell4x3 => 12,
            MonitorLayout::Cell4x4 => 16,
            MonitorLayout::Cell5x5 => 25,
            MonitorLayout::Unknown => 0,
        }
    }
}

wire_enum! {
    /// What a schedule does while active
    ScheduleAction {
        Record => "record",
        RecordAlarm => "recordAlarm",
        RecordMotion => "recordMotion",
        EnableRule => "enableRule",
        Custom => "custom",
    }
}

wire_enum! {
    ScheduleRecurrence {
        Once => "once",
        Daily => "daily",
        Weekly => "weekly",
        Monthly => "monthly",
        Continuous => "continuous",
    }
}

wire_enum! {
    VolumeState {
        Online => "online",
        Offline => "offline",
        Full => "full",
        Degraded => "degraded",
        Initializing => "initializing",
    }
}

wire_enum! {
    VolumeType {
        Local => "local",
        Iscsi => "iscsi",
        Nfs => "nfs",
        Smb => "smb",
    }
}

wire_enum! {
    /// Analytic detection performed by a behavior
    AnalyticBehaviorType {
        ObjectCounting => "objectCounting",
        Loitering => "loitering",
        LineCrossing => "lineCrossing",
        ObjectLeft => "objectLeft",
        ObjectRemoved => "objectRemoved",
        DirectionalMotion => "directionalMotion",
        Tamper => "tamper",
    }
}

wire_enum! {
    ReportFormat {
        Csv => "csv",
        Pdf => "pdf",
        Html => "html",
        Json => "json",
    }
}

wire_enum! {
    MarkerType {
        Camera => "camera",
        Door => "door",
        Alarm => "alarm",
        Monitor => "monitor",
        Label => "label",
    }
}

wire_enum! {
    Severity {
        Info => "info",
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

wire_enum! {
    /// Breadth of a granted privilege
    PrivilegeScope {
        System => "system",
        Site => "site",
        Resource => "resource",
    }
}

wire_enum! {
    /// Stream transport offered by a device endpoint
    Protocol {
        Rtsp => "rtsp",
        Http => "http",
        Https => "https",
        Onvif => "onvif",
        Rtp => "rtp",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_value_is_unknown() {
        let t: DeviceType = serde_json::from_str("\"hologram\"").unwrap();
        assert_eq!(t, DeviceType::Unknown);
        assert!(!t.is_known());
    }

    #[test]
    fn test_known_values_round_trip() {
        for layout in MonitorLayout::VARIANTS {
            let json = serde_json::to_string(layout).unwrap();
            let back: MonitorLayout = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *layout);
            assert!(back.is_known());
        }
    }

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(ScheduleAction::default(), ScheduleAction::Unknown);
        assert_eq!(VolumeState::default().to_string(), "unknown");
    }

    #[test]
    fn test_layout_cell_count() {
        assert_eq!(MonitorLayout::Cell2x2.cell_count(), 4);
        assert_eq!(MonitorLayout::parse("3x3").cell_count(), 9);
        assert_eq!(MonitorLayout::Unknown.cell_count(), 0);
    }
}
