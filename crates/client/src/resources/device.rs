//! Devices: cameras, encoders, recorders and other networked hardware

use serde::{Deserialize, Serialize};

use vxsdk_common::{
    Collection, CollectionQuery, Description, DeviceEndpoint, DeviceState, DeviceType, FilterKey,
    Id, Name, Result,
};

use super::data_source::DataSourceData;
use super::resource_data;
use crate::handle::Handle;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceData {
    pub id: Id,
    pub name: Name,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub state: DeviceState,
    pub vendor: Name,
    pub model: Name,
    pub serial: Name,
    pub firmware_version: Name,
    pub ip: Description,
    pub location: Description,
    pub is_commissioned: bool,
    pub endpoints: Vec<DeviceEndpoint>,
}

resource_data!(DeviceData, "devices");

pub type Device = Handle<DeviceData>;

/// Filters accepted by [`Device::data_sources`]
pub const DEVICE_DATA_SOURCE_FILTERS: &[FilterKey] = &[
    FilterKey::AdvancedQuery,
    FilterKey::AllTags,
    FilterKey::Id,
    FilterKey::Name,
    FilterKey::Number,
    FilterKey::Type,
    FilterKey::State,
];

impl Handle<DeviceData> {
    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        let name = Name::for_field("name", name)?;
        self.update("name", name, |d, v| d.name = v).await
    }

    pub async fn set_location(&mut self, location: &str) -> Result<()> {
        let location = Description::for_field("location", location)?;
        self.update("location", location, |d, v| d.location = v).await
    }

    /// Commission or decommission the device
    pub async fn set_commissioned(&mut self, commissioned: bool) -> Result<()> {
        self.update("isCommissioned", commissioned, |d, v| d.is_commissioned = v)
            .await
    }

    /// Data sources hosted by this device
    pub async fn data_sources(&self, query: &CollectionQuery) -> Result<Collection<Handle<DataSourceData>>> {
        self.related("dataSources", query, DEVICE_DATA_SOURCE_FILTERS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::seeded;
    use serde_json::json;

    #[tokio::test]
    async fn test_commissioning_and_data_sources() {
        let (mock, mut device) = seeded::<DeviceData>(
            "devices/dev-1",
            json!({"name": "Lobby cam", "type": "camera", "state": "online", "isCommissioned": false}),
        )
        .await;
        assert_eq!(device.device_type, DeviceType::Camera);

        device.set_commissioned(true).await.unwrap();
        assert!(device.is_commissioned);
        assert_eq!(mock.get("devices/dev-1").unwrap()["isCommissioned"], true);

        mock.insert("dataSources/ds-1", json!({"name": "Lobby video", "deviceId": "dev-1"}));
        mock.link("devices/dev-1", "dataSources", "ds-1");
        let sources = device.data_sources(&CollectionQuery::new()).await.unwrap();
        assert_eq!(sources.total_count, 1);
        assert_eq!(sources.items[0].path(), "dataSources/ds-1");
    }

    #[tokio::test]
    async fn test_unknown_fields_are_tolerated() {
        let (_, device) = seeded::<DeviceData>(
            "devices/dev-2",
            json!({"name": "Encoder", "type": "quantumEncoder", "futureField": 7}),
        )
        .await;
        assert_eq!(device.device_type, DeviceType::Unknown);
        assert_eq!(device.id(), "dev-2");
    }
}
