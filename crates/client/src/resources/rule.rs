//! Rules: situation triggers wired to automatic responses

use serde::{Deserialize, Serialize};

use vxsdk_common::{
    Collection, CollectionQuery, Description, FilterKey, Id, Name, Result, RuleResponse,
    RuleTrigger,
};

use super::resource_data;
use super::schedule::ScheduleData;
use crate::handle::Handle;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleData {
    pub id: Id,
    pub name: Name,
    pub description: Description,
    pub is_enabled: bool,
    pub triggers: Vec<RuleTrigger>,
    pub responses: Vec<RuleResponse>,
}

resource_data!(RuleData, "rules");

pub type Rule = Handle<RuleData>;

/// Filters accepted by [`Rule::schedules`]
pub const RULE_SCHEDULE_FILTERS: &[FilterKey] = &[FilterKey::Name, FilterKey::Enabled];

impl Handle<RuleData> {
    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        let name = Name::for_field("name", name)?;
        self.update("name", name, |d, v| d.name = v).await
    }

    pub async fn set_description(&mut self, description: &str) -> Result<()> {
        let description = Description::for_field("description", description)?;
        self.update("description", description, |d, v| d.description = v).await
    }

    pub async fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.update("isEnabled", enabled, |d, v| d.is_enabled = v).await
    }

    pub async fn set_triggers(&mut self, triggers: Vec<RuleTrigger>) -> Result<()> {
        self.update("triggers", triggers, |d, v| d.triggers = v).await
    }

    pub async fn set_responses(&mut self, responses: Vec<RuleResponse>) -> Result<()> {
        self.update("responses", responses, |d, v| d.responses = v).await
    }

    /// Schedules gating when this rule is active
    pub async fn schedules(&self, query: &CollectionQuery) -> Result<Collection<Handle<ScheduleData>>> {
        self.related("schedules", query, RULE_SCHEDULE_FILTERS).await
    }

    pub async fn link_schedule(&mut self, schedule_id: &str) -> Result<()> {
        self.link("schedules", schedule_id).await
    }

    pub async fn unlink_schedule(&mut self, schedule_id: &str) -> Result<()> {
        self.unlink("schedules", schedule_id).await
    }
}
