//! Rule Commands

use anyhow::Result;
use clap::Subcommand;
use tracing::debug;
use serde::Serialize;

use vxsdk_client::resources::{Rule, RuleData};
use vxsdk_client::VxClient;

use super::ListArgs;
use crate::output::{print_item, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum RuleCommands {
    /// List rules
    List(ListArgs),

    /// Get rule details
    Get {
        /// Rule ID
        id: String,
    },

    /// Enable a rule
    Enable {
        /// Rule ID
        id: String,
    },

    /// Disable a rule
    Disable {
        /// Rule ID
        id: String,
    },
}

#[derive(Serialize)]
pub struct RuleDisplay {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub triggers: Vec<String>,
    pub responses: Vec<String>,
}

impl From<&RuleData> for RuleDisplay {
    fn from(rule: &RuleData) -> Self {
        Self {
            id: rule.id.to_string(),
            name: rule.name.to_string(),
            enabled: rule.is_enabled,
            triggers: rule.triggers.iter().map(|t| t.situation_type.to_string()).collect(),
            responses: rule.responses.iter().map(|r| r.action.to_string()).collect(),
        }
    }
}

impl TableDisplay for RuleDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Enabled", "Triggers", "Responses"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.enabled.to_string(),
            self.triggers.join(", "),
            self.responses.join(", "),
        ]
    }
}

async fn set_enabled(client: &VxClient, id: &str, enabled: bool) -> Result<Rule> {
    let mut rule: Rule = client.get(id).await?;
    if rule.is_enabled == enabled {
        debug!("Rule '{}' already has enabled={}", id, enabled);
    }
    rule.set_enabled(enabled).await?;
    Ok(rule)
}

pub async fn execute(cmd: RuleCommands, client: VxClient, format: OutputFormat) -> Result<()> {
    match cmd {
        RuleCommands::List(args) => {
            let rules = client.rules(&args.to_query()).await?;
            let displays: Vec<RuleDisplay> = rules.iter().map(|r| RuleDisplay::from(r.data())).collect();
            print_list(&displays, rules.total_count, format);
        }

        RuleCommands::Get { id } => {
            let rule: Rule = client.get(&id).await?;
            print_item(&RuleDisplay::from(rule.data()), format);
        }

        RuleCommands::Enable { id } => {
            let rule = set_enabled(&client, &id, true).await?;
            print_success(&format!("Rule '{}' enabled", rule.name));
        }

        RuleCommands::Disable { id } => {
            let rule = set_enabled(&client, &id, false).await?;
            print_success(&format!("Rule '{}' disabled", rule.name));
        }
    }

    Ok(())
}
