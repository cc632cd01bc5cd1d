//! System configuration commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use vxsdk_client::{SystemConfiguration, VxClient};

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show every configuration area
    Show,
}

/// One setting of one configuration area
#[derive(Serialize)]
pub struct SettingDisplay {
    pub area: &'static str,
    pub setting: &'static str,
    pub value: String,
}

impl TableDisplay for SettingDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Area", "Setting", "Value"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.area.to_string(), self.setting.to_string(), self.value.clone()]
    }
}

fn setting(area: &'static str, setting: &'static str, value: impl ToString) -> SettingDisplay {
    SettingDisplay {
        area,
        setting,
        value: value.to_string(),
    }
}

fn settings(config: &SystemConfiguration) -> Vec<SettingDisplay> {
    let policy = &config.auth.password_policy;
    vec![
        setting("auth", "sessionTimeoutMins", config.auth.session_timeout_mins),
        setting("auth", "maxFailedLogins", config.auth.max_failed_logins),
        setting("auth", "lockoutMins", config.auth.lockout_mins),
        setting("auth", "passwordMinLength", policy.min_length),
        setting("auth", "ldap", config.auth.is_ldap_enabled),
        setting("bookmark", "maxLockDays", config.bookmark.max_lock_days),
        setting("bookmark", "preRollSecs", config.bookmark.default_pre_roll_secs),
        setting("bookmark", "postRollSecs", config.bookmark.default_post_roll_secs),
        setting("cluster", "name", &config.cluster.name),
        setting("cluster", "enabled", config.cluster.is_enabled),
        setting("cluster", "nodes", config.cluster.node_ids.len()),
        setting("smtp", "enabled", config.smtp.is_enabled),
        setting("smtp", "server", format!("{}:{}", config.smtp.host, config.smtp.port)),
        setting("smtp", "sender", &config.smtp.sender),
        setting("time", "ntp", config.time.is_ntp_enabled),
        setting("time", "ntpServer", &config.time.ntp_server),
        setting("time", "timeZone", &config.time.time_zone),
    ]
}

pub async fn execute(cmd: ConfigCommands, client: VxClient, format: OutputFormat) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = client.configuration().await?;
            let rows = settings(&config);
            print_list(&rows, rows.len(), format);
        }
    }

    Ok(())
}
