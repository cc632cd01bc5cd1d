//! Bookmarks: annotated points in recorded video

use serde::{Deserialize, Serialize};

use vxsdk_common::{Description, Id, Name, Result, TimeRange, Timestamp};

use super::data_source::DataSourceData;
use super::resource_data;
use crate::handle::{check_id, Handle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookmarkData {
    pub id: Id,
    pub description: Description,
    pub time: Timestamp,
    pub data_source_id: Id,
    pub creator_name: Name,
    /// Locked bookmarks protect `lock_range` from retention cleanup
    pub is_locked: bool,
    pub lock_range: TimeRange,
}

resource_data!(BookmarkData, "bookmarks");

pub type Bookmark = Handle<BookmarkData>;

impl Handle<BookmarkData> {
    pub async fn set_description(&mut self, description: &str) -> Result<()> {
        let description = Description::for_field("description", description)?;
        self.update("description", description, |d, v| d.description = v).await
    }

    pub async fn set_time(&mut self, time: Timestamp) -> Result<()> {
        self.update("time", time, |d, v| d.time = v).await
    }

    pub async fn set_locked(&mut self, locked: bool) -> Result<()> {
        self.update("isLocked", locked, |d, v| d.is_locked = v).await
    }

    pub async fn set_lock_range(&mut self, lock_range: TimeRange) -> Result<()> {
        lock_range.validate()?;
        self.update("lockRange", lock_range, |d, v| d.lock_range = v).await
    }

    /// The data source this bookmark points into
    pub async fn data_source(&self) -> Result<Handle<DataSourceData>> {
        let id = check_id("dataSourceId", &self.data_source_id)?;
        let path = format!("dataSources/{}", id);
        Handle::fetch(self.transport().clone(), path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::seeded;
    use serde_json::json;
    use vxsdk_common::ResultCode;

    #[tokio::test]
    async fn test_lock_and_data_source() {
        let (mock, mut bookmark) = seeded::<BookmarkData>(
            "bookmarks/b1",
            json!({"description": "Forklift incident", "time": "2024-04-02T10:15:00Z", "dataSourceId": "ds-9"}),
        )
        .await;

        bookmark.set_locked(true).await.unwrap();
        assert!(bookmark.is_locked);

        let err = bookmark.data_source().await.unwrap_err();
        assert_eq!(err.code(), ResultCode::NotFound);

        mock.insert("dataSources/ds-9", json!({"name": "Warehouse"}));
        assert_eq!(bookmark.data_source().await.unwrap().name, "Warehouse");
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_fields() {
        let (mock, mut bookmark) =
            seeded::<BookmarkData>("bookmarks/b2", json!({"description": "Before"})).await;
        mock.update_field("bookmarks/b2", "description", json!("After"));
        mock.set_offline(true);

        let err = bookmark.refresh().await.unwrap_err();
        assert_eq!(err.code(), ResultCode::CommunicationFailure);
        assert_eq!(bookmark.description, "Before");

        mock.set_offline(false);
        bookmark.refresh().await.unwrap();
        assert_eq!(bookmark.description, "After");
    }
}
