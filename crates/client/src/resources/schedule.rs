//! Schedules: time- or event-driven recording and rule activation

use serde::{Deserialize, Serialize};

use vxsdk_common::{
    Collection, CollectionQuery, FilterKey, Id, Name, Result, ScheduleAction, ScheduleRecurrence,
    ScheduleTrigger, TimeRange,
};

use super::data_source::DataSourceData;
use super::resource_data;
use crate::handle::{ensure_known, Handle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleData {
    pub id: Id,
    pub name: Name,
    pub action: ScheduleAction,
    pub recurrence: ScheduleRecurrence,
    pub time_range: TimeRange,
    pub is_enabled: bool,
    pub triggers: Vec<ScheduleTrigger>,
}

resource_data!(ScheduleData, "schedules");

pub type Schedule = Handle<ScheduleData>;

/// Filters accepted by [`Schedule::data_sources`]
pub const SCHEDULE_DATA_SOURCE_FILTERS: &[FilterKey] =
    &[FilterKey::AdvancedQuery, FilterKey::AllTags, FilterKey::Linked];

impl Handle<ScheduleData> {
    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        let name = Name::for_field("name", name)?;
        self.update("name", name, |d, v| d.name = v).await
    }

    pub async fn set_action(&mut self, action: ScheduleAction) -> Result<()> {
        let action = ensure_known("action", action)?;
        self.update("action", action, |d, v| d.action = v).await
    }

    pub async fn set_recurrence(&mut self, recurrence: ScheduleRecurrence) -> Result<()> {
        let recurrence = ensure_known("recurrence", recurrence)?;
        self.update("recurrence", recurrence, |d, v| d.recurrence = v).await
    }

    pub async fn set_time_range(&mut self, time_range: TimeRange) -> Result<()> {
        time_range.validate()?;
        self.update("timeRange", time_range, |d, v| d.time_range = v).await
    }

    pub async fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.update("isEnabled", enabled, |d, v| d.is_enabled = v).await
    }

    pub async fn set_triggers(&mut self, triggers: Vec<ScheduleTrigger>) -> Result<()> {
        self.update("triggers", triggers, |d, v| d.triggers = v).await
    }

    /// Data sources governed by this schedule
    pub async fn data_sources(&self, query: &CollectionQuery) -> Result<Collection<Handle<DataSourceData>>> {
        self.related("dataSources", query, SCHEDULE_DATA_SOURCE_FILTERS).await
    }

    pub async fn link_data_source(&mut self, data_source_id: &str) -> Result<()> {
        self.link("dataSources", data_source_id).await
    }

    pub async fn unlink_data_source(&mut self, data_source_id: &str) -> Result<()> {
        self.unlink("dataSources", data_source_id).await
    }
}
