//! Resource Implementations
//!
//! One module per resource type: its wire data, typed setters and the
//! relations it exposes. Each relation documents the filter keys the server
//! accepts for it.

pub mod analytics;
pub mod bookmark;
pub mod data_source;
pub mod device;
pub mod drawing;
pub mod monitor;
pub mod report;
pub mod rule;
pub mod schedule;
pub mod user;
pub mod volume;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

pub use analytics::{AnalyticBehavior, AnalyticBehaviorData, AnalyticConfig, AnalyticConfigData};
pub use bookmark::{Bookmark, BookmarkData};
pub use data_source::{DataSource, DataSourceData};
pub use device::{Device, DeviceData};
pub use drawing::{Drawing, DrawingData, Marker, MarkerData};
pub use monitor::{Monitor, MonitorData};
pub use report::{Report, ReportData, ReportTemplate, ReportTemplateData};
pub use rule::{Rule, RuleData};
pub use schedule::{Schedule, ScheduleData};
pub use user::{Privilege, PrivilegeData, Role, RoleData, User, UserData};
pub use volume::{Volume, VolumeData};

/// Data of a resource type as served by the API
pub trait ResourceData:
    Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    /// Path segment of the collection holding this resource
    const COLLECTION: &'static str;

    /// Server-assigned identifier
    fn id(&self) -> &str;
}

/// Implement [`ResourceData`] for a struct with an `id: Id` field
macro_rules! resource_data {
    ($ty:ty, $collection:literal) => {
        impl $crate::resources::ResourceData for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> &str {
                self.id.as_str()
            }
        }
    };
}

pub(crate) use resource_data;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::handle::Handle;
    use crate::mock::MockTransport;
    use crate::resources::ResourceData;

    /// Seed `value` at `path` and fetch a handle to it
    pub async fn seeded<T: ResourceData>(path: &str, value: serde_json::Value) -> (Arc<MockTransport>, Handle<T>) {
        let mock = Arc::new(MockTransport::new());
        mock.insert(path, value);
        let handle = Handle::fetch(mock.clone(), path).await.unwrap();
        (mock, handle)
    }
}
