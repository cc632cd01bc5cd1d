//! Video analytics: per-data-source configurations and the behaviors they run

use serde::{Deserialize, Serialize};

use vxsdk_common::{
    AnalyticBehaviorType, Collection, CollectionQuery, Error, FilterKey, Id, Name,
    NewAnalyticBehavior, Result, ResultCode,
};

use super::resource_data;
use crate::handle::{ensure_known, Handle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticConfigData {
    pub id: Id,
    pub name: Name,
    pub data_source_id: Id,
    pub is_enabled: bool,
}

resource_data!(AnalyticConfigData, "analyticConfigs");

pub type AnalyticConfig = Handle<AnalyticConfigData>;

/// One detection running under an analytic configuration.
///
/// Behaviors are owned by their configuration and addressed under its path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticBehaviorData {
    pub id: Id,
    pub name: Name,
    #[serde(rename = "type")]
    pub behavior_type: AnalyticBehaviorType,
    pub sensitivity: u8,
    pub is_enabled: bool,
}

resource_data!(AnalyticBehaviorData, "behaviors");

pub type AnalyticBehavior = Handle<AnalyticBehaviorData>;

/// Filters accepted by [`AnalyticConfig::behaviors`]
pub const BEHAVIOR_FILTERS: &[FilterKey] = &[FilterKey::Name, FilterKey::Type, FilterKey::Enabled];

const MAX_SENSITIVITY: u8 = 100;

fn check_sensitivity(sensitivity: u8) -> Result<()> {
    if sensitivity > MAX_SENSITIVITY {
        return Err(Error::rejected(
            "sensitivity",
            ResultCode::ValueOutOfRange,
            format!("{} exceeds {}", sensitivity, MAX_SENSITIVITY),
        ));
    }
    Ok(())
}

impl Handle<AnalyticConfigData> {
    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        let name = Name::for_field("name", name)?;
        self.update("name", name, |d, v| d.name = v).await
    }

    pub async fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.update("isEnabled", enabled, |d, v| d.is_enabled = v).await
    }

    pub async fn behaviors(&self, query: &CollectionQuery) -> Result<Collection<Handle<AnalyticBehaviorData>>> {
        self.owned_collection(query, BEHAVIOR_FILTERS).await
    }

    pub async fn behavior(&self, id: &str) -> Result<Handle<AnalyticBehaviorData>> {
        self.owned(id).await
    }

    pub async fn add_behavior(&mut self, behavior: &NewAnalyticBehavior) -> Result<Handle<AnalyticBehaviorData>> {
        ensure_known("type", behavior.behavior_type)?;
        check_sensitivity(behavior.sensitivity)?;
        self.create_owned(behavior).await
    }
}

impl Handle<AnalyticBehaviorData> {
    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        let name = Name::for_field("name", name)?;
        self.update("name", name, |d, v| d.name = v).await
    }

    pub async fn set_behavior_type(&mut self, behavior_type: AnalyticBehaviorType) -> Result<()> {
        let behavior_type = ensure_known("type", behavior_type)?;
        self.update("type", behavior_type, |d, v| d.behavior_type = v).await
    }

    /// Detection sensitivity, 0 to 100
    pub async fn set_sensitivity(&mut self, sensitivity: u8) -> Result<()> {
        check_sensitivity(sensitivity)?;
        self.update("sensitivity", sensitivity, |d, v| d.sensitivity = v).await
    }

    pub async fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.update("isEnabled", enabled, |d, v| d.is_enabled = v).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::seeded;
    use serde_json::json;

    fn loitering(name: &str) -> NewAnalyticBehavior {
        NewAnalyticBehavior {
            name: name.parse().unwrap(),
            behavior_type: AnalyticBehaviorType::Loitering,
            sensitivity: 60,
        }
    }

    #[tokio::test]
    async fn test_owned_behaviors() {
        let (mock, mut config) =
            seeded::<AnalyticConfigData>("analyticConfigs/ac1", json!({"name": "Parking", "dataSourceId": "ds-1"})).await;

        let mut behavior = config.add_behavior(&loitering("Loiter zone A")).await.unwrap();
        assert!(behavior.path().starts_with("analyticConfigs/ac1/behaviors/"));
        assert_eq!(behavior.behavior_type, AnalyticBehaviorType::Loitering);

        behavior.set_sensitivity(80).await.unwrap();
        let id = behavior.id().to_string();
        let fetched = config.behavior(&id).await.unwrap();
        assert_eq!(fetched.sensitivity, 80);

        let all = config.behaviors(&CollectionQuery::new()).await.unwrap();
        assert_eq!(all.total_count, 1);
        assert_eq!(all.items[0].path(), behavior.path());

        // deleting the config takes its behaviors with it
        config.delete_remote().await.unwrap();
        assert!(mock.get(behavior.path()).is_none());
    }

    #[tokio::test]
    async fn test_sensitivity_range() {
        let (mock, mut config) = seeded::<AnalyticConfigData>("analyticConfigs/ac2", json!({})).await;
        let mut too_hot = loitering("Hot");
        too_hot.sensitivity = 101;
        let err = config.add_behavior(&too_hot).await.unwrap_err();
        assert_eq!(err.code(), ResultCode::ValueOutOfRange);
        assert_eq!(mock.requests().len(), 1);
    }
}
