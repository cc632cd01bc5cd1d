//! Creation payloads and the value objects nested inside them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bounded::{BoundedString, Description, Id, Name, SituationType, Timestamp};
use crate::error::{Error, Result};
use crate::result::ResultCode;
use crate::types::{
    AnalyticBehaviorType, MarkerType, MonitorLayout, ReportFormat, ScheduleAction,
    ScheduleRecurrence, Severity, VolumeType,
};
use crate::value::{MonitorCell, Parameter, PasswordPolicy, ReportField, TimeRange, ValueObject};

/// Password text
pub type Password = BoundedString<128>;

/// Email address
pub type Email = BoundedString<128>;

/// Event condition that fires a rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleTrigger {
    pub situation_type: SituationType,
    #[serde(default)]
    pub source_device_ids: Vec<Id>,
    pub min_severity: Severity,
}

impl ValueObject for RuleTrigger {}

/// Action taken when a rule fires
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleResponse {
    pub action: Name,
    #[serde(default)]
    pub target_ids: Vec<Id>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl ValueObject for RuleResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRule {
    pub name: Name,
    pub description: Description,
    pub is_enabled: bool,
    #[serde(default)]
    pub triggers: Vec<RuleTrigger>,
    #[serde(default)]
    pub responses: Vec<RuleResponse>,
    #[serde(default)]
    pub schedule_ids: Vec<Id>,
}

impl ValueObject for NewRule {}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: Name,
    pub password: Password,
    pub first_name: Name,
    pub last_name: Name,
    pub email: Email,
    pub domain: Name,
    pub must_change_password: bool,
    #[serde(default)]
    pub role_ids: Vec<Id>,
}

impl NewUser {
    /// Check the password against a policy before sending.
    ///
    /// Reports the first violated rule using the matching password code.
    pub fn validate(&self, policy: &PasswordPolicy) -> Result<()> {
        check_password(&self.name, &self.password, policy)
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("domain", &self.domain)
            .field("must_change_password", &self.must_change_password)
            .field("role_ids", &self.role_ids)
            .finish()
    }
}

impl ValueObject for NewUser {}

/// Validate a password for `username` against `policy`
pub fn check_password(username: &str, password: &str, policy: &PasswordPolicy) -> Result<()> {
    let len = password.chars().count() as u32;
    let violation = if len < policy.min_length {
        Some((ResultCode::PasswordTooShort, "password is too short"))
    } else if policy.max_length > 0 && len > policy.max_length {
        Some((ResultCode::PasswordTooLong, "password is too long"))
    } else if policy.require_uppercase && !password.chars().any(char::is_uppercase) {
        Some((ResultCode::PasswordMissingUppercase, "password needs an uppercase letter"))
    } else if policy.require_lowercase && !password.chars().any(char::is_lowercase) {
        Some((ResultCode::PasswordMissingLowercase, "password needs a lowercase letter"))
    } else if policy.require_number && !password.chars().any(|c| c.is_ascii_digit()) {
        Some((ResultCode::PasswordMissingNumber, "password needs a digit"))
    } else if policy.require_special && password.chars().all(char::is_alphanumeric) {
        Some((ResultCode::PasswordMissingSpecial, "password needs a special character"))
    } else if policy.disallow_username
        && !username.is_empty()
        && password.to_lowercase().contains(&username.to_lowercase())
    {
        Some((ResultCode::PasswordContainsUsername, "password contains the user name"))
    } else {
        None
    };

    match violation {
        Some((code, reason)) => Err(Error::rejected("password", code, reason)),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMonitor {
    pub name: Name,
    pub number: u32,
    pub layout: MonitorLayout,
    #[serde(default)]
    pub cells: Vec<MonitorCell>,
}

impl ValueObject for NewMonitor {}

/// Event that activates a schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleTrigger {
    pub situation_type: SituationType,
    #[serde(default)]
    pub source_ids: Vec<Id>,
    /// Seconds the schedule stays active after the event
    pub duration_secs: u32,
}

impl ValueObject for ScheduleTrigger {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    pub name: Name,
    pub action: ScheduleAction,
    pub recurrence: ScheduleRecurrence,
    pub time_range: TimeRange,
    #[serde(default)]
    pub data_source_ids: Vec<Id>,
    #[serde(default)]
    pub triggers: Vec<ScheduleTrigger>,
}

impl ValueObject for NewSchedule {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    pub description: Description,
    pub time: Timestamp,
    pub data_source_id: Id,
    pub is_locked: bool,
    pub lock_range: TimeRange,
}

impl ValueObject for NewBookmark {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDrawing {
    pub name: Name,
    pub image_id: Id,
}

impl ValueObject for NewDrawing {}

/// Placement of an item on a drawing, in normalized coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMarker {
    pub name: Name,
    #[serde(rename = "type")]
    pub marker_type: MarkerType,
    pub x: f32,
    pub y: f32,
    pub linked_id: Id,
}

impl ValueObject for NewMarker {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRole {
    pub name: Name,
    pub description: Description,
}

impl ValueObject for NewRole {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVolume {
    pub name: Name,
    #[serde(rename = "type")]
    pub volume_type: VolumeType,
    pub path: Description,
    pub capacity_gb: u64,
    pub retention_days: u32,
}

impl ValueObject for NewVolume {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReportTemplate {
    pub name: Name,
    pub format: ReportFormat,
    #[serde(default)]
    pub fields: Vec<ReportField>,
}

impl ValueObject for NewReportTemplate {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnalyticBehavior {
    pub name: Name,
    #[serde(rename = "type")]
    pub behavior_type: AnalyticBehaviorType,
    pub sensitivity: u8,
}

impl ValueObject for NewAnalyticBehavior {}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger(situation: &str, devices: &[&str]) -> RuleTrigger {
        RuleTrigger {
            situation_type: situation.parse().unwrap(),
            source_device_ids: devices.iter().map(|d| d.parse().unwrap()).collect(),
            min_severity: Severity::Medium,
        }
    }

    #[test]
    fn test_new_rule_deep_copy() {
        let rule = NewRule {
            name: "door alarm".parse().unwrap(),
            is_enabled: true,
            triggers: vec![
                trigger("system/doorForced", &["dev-1"]),
                trigger("system/motion", &["dev-2", "dev-3"]),
            ],
            ..Default::default()
        };
        assert_eq!(rule.triggers.len(), 2);

        let mut copy = rule.clone();
        assert_eq!(copy, rule);
        assert_eq!(copy.triggers[0].situation_type, rule.triggers[0].situation_type);
        assert_ne!(copy.triggers.as_ptr(), rule.triggers.as_ptr());

        copy.triggers[0].source_device_ids.push("dev-9".parse().unwrap());
        copy.triggers.pop();
        assert_eq!(rule.triggers.len(), 2);
        assert_eq!(rule.triggers[0].source_device_ids.len(), 1);
    }

    #[test]
    fn test_empty_arrays_stay_empty_on_copy() {
        let rule = NewRule::default();
        let copy = rule.clone();
        assert!(copy.triggers.is_empty());
        assert!(copy.schedule_ids.is_empty());
    }

    #[test]
    fn test_clear_resets_payloads() {
        let mut schedule = NewSchedule {
            name: "nightly".parse().unwrap(),
            action: ScheduleAction::Record,
            recurrence: ScheduleRecurrence::Daily,
            data_source_ids: vec!["ds-1".parse().unwrap()],
            ..Default::default()
        };
        schedule.clear();
        assert_eq!(schedule, NewSchedule::default());
        assert_eq!(schedule.action, ScheduleAction::Unknown);

        let mut marker = NewMarker {
            name: "lobby".parse().unwrap(),
            x: 0.25,
            y: 0.75,
            ..Default::default()
        };
        marker.clear();
        assert_eq!(marker, NewMarker::default());
    }

    #[test]
    fn test_password_policy() {
        let policy = PasswordPolicy {
            min_length: 8,
            require_uppercase: true,
            require_number: true,
            require_special: true,
            disallow_username: true,
            ..Default::default()
        };

        let check = |pw: &str| check_password("operator", pw, &policy).map_err(|e| e.code());
        assert_eq!(check("Ab1!"), Err(ResultCode::PasswordTooShort));
        assert_eq!(check("abcdefg1!"), Err(ResultCode::PasswordMissingUppercase));
        assert_eq!(check("Abcdefgh!"), Err(ResultCode::PasswordMissingNumber));
        assert_eq!(check("Abcdefgh1"), Err(ResultCode::PasswordMissingSpecial));
        assert_eq!(check("xOperator1!"), Err(ResultCode::PasswordContainsUsername));
        assert_eq!(check("Str0ng!Pass"), Ok(()));
    }

    #[test]
    fn test_new_user_validate_uses_name() {
        let user = NewUser {
            name: "alice".parse().unwrap(),
            password: "alice-Secret1".parse().unwrap(),
            ..Default::default()
        };
        let policy = PasswordPolicy {
            disallow_username: true,
            ..Default::default()
        };
        assert_eq!(
            user.validate(&policy).unwrap_err().code(),
            ResultCode::PasswordContainsUsername
        );
    }

    #[test]
    fn test_new_user_debug_hides_password() {
        let user = NewUser {
            name: "operator".parse().unwrap(),
            password: "Blue-heron-77".parse().unwrap(),
            ..Default::default()
        };
        let text = format!("{:?}", user);
        assert!(text.contains("operator"));
        assert!(!text.contains("Blue-heron-77"));
    }
}
