//! Storage volumes holding recorded media

use serde::{Deserialize, Serialize};

use vxsdk_common::{
    Collection, CollectionQuery, Description, Error, FilterKey, Id, Name, Result, ResultCode,
    VolumeState, VolumeType,
};

use super::data_source::DataSourceData;
use super::resource_data;
use crate::handle::Handle;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeData {
    pub id: Id,
    pub name: Name,
    #[serde(rename = "type")]
    pub volume_type: VolumeType,
    pub state: VolumeState,
    pub path: Description,
    pub capacity_gb: u64,
    pub used_gb: u64,
    pub retention_days: u32,
    pub is_enabled: bool,
}

resource_data!(VolumeData, "volumes");

pub type Volume = Handle<VolumeData>;

/// Filters accepted by [`Volume::data_sources`]
pub const VOLUME_DATA_SOURCE_FILTERS: &[FilterKey] = &[FilterKey::Name, FilterKey::Type, FilterKey::State];

impl VolumeData {
    /// Free space in GiB, never negative
    pub fn free_gb(&self) -> u64 {
        self.capacity_gb.saturating_sub(self.used_gb)
    }
}

impl Handle<VolumeData> {
    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        let name = Name::for_field("name", name)?;
        self.update("name", name, |d, v| d.name = v).await
    }

    pub async fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.update("isEnabled", enabled, |d, v| d.is_enabled = v).await
    }

    /// Days recordings are kept; zero keeps them until space runs out
    pub async fn set_retention_days(&mut self, days: u32) -> Result<()> {
        if days > 3650 {
            return Err(Error::rejected("retentionDays", ResultCode::ValueOutOfRange, "at most 3650 days"));
        }
        self.update("retentionDays", days, |d, v| d.retention_days = v).await
    }

    /// Data sources recording to this volume
    pub async fn data_sources(&self, query: &CollectionQuery) -> Result<Collection<Handle<DataSourceData>>> {
        self.related("dataSources", query, VOLUME_DATA_SOURCE_FILTERS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::seeded;
    use serde_json::json;

    #[tokio::test]
    async fn test_retention_bounds() {
        let (mock, mut volume) = seeded::<VolumeData>(
            "volumes/v1",
            json!({"name": "Archive", "type": "nfs", "capacityGb": 500, "usedGb": 620}),
        )
        .await;
        assert_eq!(volume.volume_type, VolumeType::Nfs);
        assert_eq!(volume.free_gb(), 0);

        let err = volume.set_retention_days(10_000).await.unwrap_err();
        assert_eq!(err.code(), ResultCode::ValueOutOfRange);

        volume.set_retention_days(30).await.unwrap();
        assert_eq!(mock.get("volumes/v1").unwrap()["retentionDays"], 30);
    }

    #[tokio::test]
    async fn test_delete_remote_blocked_by_dependents() {
        let (mock, volume) = seeded::<VolumeData>("volumes/v2", json!({"name": "Primary"})).await;
        mock.insert("dataSources/ds-1", json!({"name": "Lobby"}));
        mock.link("dataSources/ds-1", "volumes", "v2");

        let (volume, err) = volume.delete_remote().await.unwrap_err();
        assert_eq!(err.code(), ResultCode::HasDependents);
        assert_eq!(volume.name, "Primary");
        assert!(mock.get("volumes/v2").is_some());
    }
}
