//! Data sources: the video, audio and metadata streams a device produces

use serde::{Deserialize, Serialize};

use vxsdk_common::{
    Clip, Collection, CollectionQuery, DataSourceState, DataSourceType, FilterKey, Id, Name,
    Resolution, Result,
};

use super::device::DeviceData;
use super::resource_data;
use super::schedule::ScheduleData;
use crate::handle::{check_id, Handle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSourceData {
    pub id: Id,
    pub name: Name,
    pub number: u32,
    #[serde(rename = "type")]
    pub data_source_type: DataSourceType,
    pub state: DataSourceState,
    pub device_id: Id,
    pub resolution: Resolution,
    pub is_recording: bool,
    pub tags: Vec<Name>,
}

resource_data!(DataSourceData, "dataSources");

pub type DataSource = Handle<DataSourceData>;

/// Filters accepted by [`DataSource::clips`]
pub const CLIP_FILTERS: &[FilterKey] = &[FilterKey::StartTime, FilterKey::EndTime];

/// Filters accepted by [`DataSource::schedules`]
pub const DATA_SOURCE_SCHEDULE_FILTERS: &[FilterKey] =
    &[FilterKey::AdvancedQuery, FilterKey::Name, FilterKey::Enabled];

impl Handle<DataSourceData> {
    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        let name = Name::for_field("name", name)?;
        self.update("name", name, |d, v| d.name = v).await
    }

    pub async fn set_number(&mut self, number: u32) -> Result<()> {
        self.update("number", number, |d, v| d.number = v).await
    }

    pub async fn set_resolution(&mut self, resolution: Resolution) -> Result<()> {
        self.update("resolution", resolution, |d, v| d.resolution = v).await
    }

    /// Recorded spans of this data source
    pub async fn clips(&self, query: &CollectionQuery) -> Result<Collection<Clip>> {
        self.related_values("clips", query, CLIP_FILTERS).await
    }

    /// The device hosting this data source
    pub async fn device(&self) -> Result<Handle<DeviceData>> {
        let id = check_id("deviceId", &self.device_id)?;
        let path = format!("{}/{}", <DeviceData as super::ResourceData>::COLLECTION, id);
        Handle::fetch(self.transport().clone(), path).await
    }

    /// Schedules this data source is linked to
    pub async fn schedules(&self, query: &CollectionQuery) -> Result<Collection<Handle<ScheduleData>>> {
        self.related("schedules", query, DATA_SOURCE_SCHEDULE_FILTERS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::seeded;
    use serde_json::json;

    #[tokio::test]
    async fn test_clips_and_device() {
        let (mock, source) = seeded::<DataSourceData>(
            "dataSources/ds-1",
            json!({"name": "Dock", "type": "video", "deviceId": "dev-1", "resolution": {"width": 1280, "height": 720}}),
        )
        .await;
        assert_eq!(source.resolution, Resolution::new(1280, 720));

        mock.insert_values(
            "dataSources/ds-1/clips",
            vec![json!({
                "dataSourceId": "ds-1",
                "dataStorageId": "vol-1",
                "timeRange": {"startTime": "2024-05-01T00:00:00Z", "endTime": "2024-05-01T01:00:00Z"}
            })],
        );
        let query = CollectionQuery::new().filter(FilterKey::StartTime, "2024-05-01T00:00:00Z");
        let clips = source.clips(&query).await.unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips.items[0].data_storage_id, "vol-1");

        mock.insert("devices/dev-1", json!({"name": "Dock camera"}));
        let device = source.device().await.unwrap();
        assert_eq!(device.name, "Dock camera");
    }

    #[tokio::test]
    async fn test_device_requires_device_id() {
        let (mock, source) = seeded::<DataSourceData>("dataSources/ds-3", json!({"name": "Yard"})).await;
        mock.insert("devices/dev-1", json!({"name": "Yard camera"}));
        let sent = mock.requests().len();

        let err = source.device().await.unwrap_err();
        assert_eq!(err.code(), vxsdk_common::ResultCode::InvalidParameters);
        assert_eq!(mock.requests().len(), sent);
    }

    #[tokio::test]
    async fn test_set_resolution() {
        let (mock, mut source) = seeded::<DataSourceData>("dataSources/ds-2", json!({"name": "Gate"})).await;
        source.set_resolution(Resolution::new(1920, 1080)).await.unwrap();
        assert_eq!(source.resolution.width, 1920);
        assert_eq!(mock.get("dataSources/ds-2").unwrap()["resolution"]["height"], 1080);
    }
}
