//! System configuration.
//!
//! The server groups its settings into independent areas, each a singleton
//! resource under `configuration/<area>`. Every area is its own [`Handle`]
//! with its own setters and refresh; [`SystemConfiguration`] simply fetches
//! all of them together.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use vxsdk_common::{
    Description, Email, Error, Id, Name, PasswordPolicy, Result, ResultCode, Timestamp,
};

use crate::handle::Handle;
use crate::resources::ResourceData;
use crate::transport::Transport;

/// Implement [`ResourceData`] for a singleton configuration area
macro_rules! config_area {
    ($ty:ty, $area:literal) => {
        impl ResourceData for $ty {
            const COLLECTION: &'static str = "configuration";

            fn id(&self) -> &str {
                $area
            }
        }
    };
}

/// Authentication and session settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthConfigData {
    pub session_timeout_mins: u32,
    pub max_failed_logins: u32,
    pub lockout_mins: u32,
    pub password_policy: PasswordPolicy,
    pub is_ldap_enabled: bool,
    pub ldap_server: Description,
}

config_area!(AuthConfigData, "auth");

pub type AuthConfig = Handle<AuthConfigData>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookmarkConfigData {
    /// Longest period a bookmark may hold a lock; zero is unlimited
    pub max_lock_days: u32,
    pub default_pre_roll_secs: u32,
    pub default_post_roll_secs: u32,
}

config_area!(BookmarkConfigData, "bookmark");

pub type BookmarkConfig = Handle<BookmarkConfigData>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterConfigData {
    pub name: Name,
    pub is_enabled: bool,
    pub virtual_ip: Description,
    pub node_ids: Vec<Id>,
}

config_area!(ClusterConfigData, "cluster");

pub type ClusterConfig = Handle<ClusterConfigData>;

/// Outgoing mail used for notifications and scheduled reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmtpConfigData {
    pub is_enabled: bool,
    pub host: Description,
    pub port: u16,
    pub sender: Email,
    pub username: Name,
    pub use_tls: bool,
}

config_area!(SmtpConfigData, "smtp");

pub type SmtpConfig = Handle<SmtpConfigData>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeConfigData {
    pub is_ntp_enabled: bool,
    pub ntp_server: Description,
    pub time_zone: Name,
    /// Server clock when the area was read
    pub current_time: Timestamp,
}

config_area!(TimeConfigData, "time");

pub type TimeConfig = Handle<TimeConfigData>;

fn area_path<T: ResourceData + Default>() -> String {
    let area = T::default();
    format!("{}/{}", T::COLLECTION, area.id())
}

/// Fetch a single configuration area
pub async fn fetch_area<T: ResourceData + Default>(transport: Arc<dyn Transport>) -> Result<Handle<T>> {
    Handle::fetch(transport, area_path::<T>()).await
}

impl Handle<AuthConfigData> {
    pub async fn set_session_timeout_mins(&mut self, minutes: u32) -> Result<()> {
        if minutes == 0 {
            return Err(Error::rejected("sessionTimeoutMins", ResultCode::ValueOutOfRange, "must be at least 1"));
        }
        self.update("sessionTimeoutMins", minutes, |d, v| d.session_timeout_mins = v).await
    }

    pub async fn set_max_failed_logins(&mut self, attempts: u32) -> Result<()> {
        self.update("maxFailedLogins", attempts, |d, v| d.max_failed_logins = v).await
    }

    pub async fn set_password_policy(&mut self, policy: PasswordPolicy) -> Result<()> {
        if policy.max_length > 0 && policy.max_length < policy.min_length {
            return Err(Error::rejected(
                "passwordPolicy",
                ResultCode::InvalidValue,
                "maximum length is below minimum length",
            ));
        }
        self.update("passwordPolicy", policy, |d, v| d.password_policy = v).await
    }

    pub async fn set_ldap(&mut self, enabled: bool) -> Result<()> {
        self.update("isLdapEnabled", enabled, |d, v| d.is_ldap_enabled = v).await
    }
}

impl Handle<BookmarkConfigData> {
    pub async fn set_max_lock_days(&mut self, days: u32) -> Result<()> {
        self.update("maxLockDays", days, |d, v| d.max_lock_days = v).await
    }

    pub async fn set_default_pre_roll_secs(&mut self, secs: u32) -> Result<()> {
        self.update("defaultPreRollSecs", secs, |d, v| d.default_pre_roll_secs = v).await
    }

    pub async fn set_default_post_roll_secs(&mut self, secs: u32) -> Result<()> {
        self.update("defaultPostRollSecs", secs, |d, v| d.default_post_roll_secs = v).await
    }
}

impl Handle<ClusterConfigData> {
    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        let name = Name::for_field("name", name)?;
        self.update("name", name, |d, v| d.name = v).await
    }

    pub async fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.update("isEnabled", enabled, |d, v| d.is_enabled = v).await
    }
}

impl Handle<SmtpConfigData> {
    pub async fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.update("isEnabled", enabled, |d, v| d.is_enabled = v).await
    }

    /// Mail server that notifications are sent through
    pub async fn set_host(&mut self, host: &str) -> Result<()> {
        let host = Description::for_field("host", host)?;
        self.update("host", host, |d, v| d.host = v).await
    }

    pub async fn set_port(&mut self, port: u16) -> Result<()> {
        if port == 0 {
            return Err(Error::rejected("port", ResultCode::ValueOutOfRange, "port 0 is not usable"));
        }
        self.update("port", port, |d, v| d.port = v).await
    }

    pub async fn set_sender(&mut self, sender: &str) -> Result<()> {
        let sender = Email::for_field("sender", sender)?;
        self.update("sender", sender, |d, v| d.sender = v).await
    }

    pub async fn set_use_tls(&mut self, use_tls: bool) -> Result<()> {
        self.update("useTls", use_tls, |d, v| d.use_tls = v).await
    }
}

impl Handle<TimeConfigData> {
    pub async fn set_ntp_server(&mut self, server: &str) -> Result<()> {
        let server = Description::for_field("ntpServer", server)?;
        self.update("ntpServer", server, |d, v| d.ntp_server = v).await
    }

    pub async fn set_ntp_enabled(&mut self, enabled: bool) -> Result<()> {
        self.update("isNtpEnabled", enabled, |d, v| d.is_ntp_enabled = v).await
    }

    pub async fn set_time_zone(&mut self, time_zone: &str) -> Result<()> {
        let time_zone = Name::for_field("timeZone", time_zone)?;
        self.update("timeZone", time_zone, |d, v| d.time_zone = v).await
    }
}

/// Every configuration area of the system
#[derive(Debug)]
pub struct SystemConfiguration {
    pub auth: AuthConfig,
    pub bookmark: BookmarkConfig,
    pub cluster: ClusterConfig,
    pub smtp: SmtpConfig,
    pub time: TimeConfig,
}

impl SystemConfiguration {
    /// Fetch all areas concurrently; fails if any area fails
    pub async fn fetch(transport: Arc<dyn Transport>) -> Result<Self> {
        let (auth, bookmark, cluster, smtp, time) = tokio::try_join!(
            fetch_area::<AuthConfigData>(transport.clone()),
            fetch_area::<BookmarkConfigData>(transport.clone()),
            fetch_area::<ClusterConfigData>(transport.clone()),
            fetch_area::<SmtpConfigData>(transport.clone()),
            fetch_area::<TimeConfigData>(transport),
        )?;
        debug!("fetched system configuration");
        Ok(Self {
            auth,
            bookmark,
            cluster,
            smtp,
            time,
        })
    }

    /// Refresh every area. Areas that refreshed before a failure keep their
    /// new values; the failing area and those after it are unchanged.
    pub async fn refresh_all(&mut self) -> Result<()> {
        self.auth.refresh().await?;
        self.bookmark.refresh().await?;
        self.cluster.refresh().await?;
        self.smtp.refresh().await?;
        self.time.refresh().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use serde_json::json;
    use vxsdk_common::Limits;

    fn seeded() -> Arc<MockTransport> {
        let mock = Arc::new(MockTransport::new());
        mock.insert(
            "configuration/auth",
            json!({"sessionTimeoutMins": 30, "passwordPolicy": {"minLength": 8, "requireNumber": true}}),
        );
        mock.insert("configuration/bookmark", json!({"maxLockDays": 90}));
        mock.insert("configuration/cluster", json!({"name": "main", "nodeIds": ["n1", "n2"]}));
        mock.insert("configuration/smtp", json!({"host": "mail.local", "port": 25}));
        mock.insert("configuration/time", json!({"timeZone": "UTC", "isNtpEnabled": true}));
        mock
    }

    #[tokio::test]
    async fn test_fetch_all_areas() {
        let mock = seeded();
        let config = SystemConfiguration::fetch(mock.clone()).await.unwrap();
        assert_eq!(config.auth.password_policy.min_length, 8);
        assert_eq!(config.cluster.node_ids.len(), 2);
        assert_eq!(config.smtp.path(), "configuration/smtp");
        assert_eq!(config.time.id(), "time");
        assert_eq!(mock.requests().len(), 5);
    }

    #[tokio::test]
    async fn test_areas_are_independent() {
        let mock = seeded();
        let mut config = SystemConfiguration::fetch(mock.clone()).await.unwrap();

        config.smtp.set_host("relay.example.com").await.unwrap();
        config.smtp.set_port(587).await.unwrap();
        config.time.set_time_zone("Europe/Oslo").await.unwrap();
        assert_eq!(config.smtp.port, 587);
        assert_eq!(mock.get("configuration/time").unwrap()["timeZone"], "Europe/Oslo");
        assert_eq!(mock.get("configuration/auth").unwrap()["sessionTimeoutMins"], 30);
    }

    #[tokio::test]
    async fn test_smtp_port_rejection_keeps_host() {
        let mock = seeded();
        let limits: Limits = serde_json::from_value(json!({
            "integers": [{"fieldName": "port", "readOnly": true}]
        }))
        .unwrap();
        mock.set_limits("configuration/smtp", limits);
        let mut smtp = fetch_area::<SmtpConfigData>(mock.clone()).await.unwrap();

        let err = smtp.set_port(587).await.unwrap_err();
        assert_eq!(err.code(), ResultCode::ReadOnly);
        assert_eq!(smtp.port, 25);
        assert_eq!(smtp.host, "mail.local");
        assert_eq!(mock.get("configuration/smtp").unwrap()["host"], "mail.local");

        smtp.set_host("new.local").await.unwrap();
        assert_eq!(mock.get("configuration/smtp").unwrap()["port"], 25);
    }

    #[tokio::test]
    async fn test_missing_area_fails_fetch() {
        let mock = Arc::new(MockTransport::new());
        mock.insert("configuration/auth", json!({}));
        let err = SystemConfiguration::fetch(mock).await.unwrap_err();
        assert_eq!(err.code(), ResultCode::NotFound);
    }

    #[tokio::test]
    async fn test_password_policy_bounds() {
        let mock = seeded();
        let mut auth = fetch_area::<AuthConfigData>(mock).await.unwrap();
        let policy = PasswordPolicy {
            min_length: 12,
            max_length: 8,
            ..Default::default()
        };
        let err = auth.set_password_policy(policy).await.unwrap_err();
        assert_eq!(err.code(), ResultCode::InvalidValue);
        assert_eq!(auth.password_policy.min_length, 8);
    }
}
