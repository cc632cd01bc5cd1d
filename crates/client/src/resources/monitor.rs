//! Monitors: video walls and workstation displays split into cells

use serde::{Deserialize, Serialize};

use vxsdk_common::{
    Error, Id, MonitorCell, MonitorLayout, Name, Resolution, Result, ResultCode, WireEnum,
};

use super::resource_data;
use crate::handle::{ensure_known, Handle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorData {
    pub id: Id,
    pub name: Name,
    pub number: u32,
    pub layout: MonitorLayout,
    pub cells: Vec<MonitorCell>,
    pub host_device_id: Id,
    pub resolution: Resolution,
}

resource_data!(MonitorData, "monitors");

pub type Monitor = Handle<MonitorData>;

impl Handle<MonitorData> {
    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        let name = Name::for_field("name", name)?;
        self.update("name", name, |d, v| d.name = v).await
    }

    pub async fn set_number(&mut self, number: u32) -> Result<()> {
        if number == 0 {
            return Err(Error::rejected("number", ResultCode::ValueOutOfRange, "monitor numbers start at 1"));
        }
        self.update("number", number, |d, v| d.number = v).await
    }

    /// Change the cell arrangement.
    ///
    /// The server may add or drop cells; refresh to see the new cell list.
    pub async fn set_layout(&mut self, layout: MonitorLayout) -> Result<()> {
        let layout = ensure_known("layout", layout)?;
        self.update("layout", layout, |d, v| d.layout = v).await
    }

    /// Replace the cell list; every index must fit the current layout
    pub async fn set_cells(&mut self, cells: Vec<MonitorCell>) -> Result<()> {
        let capacity = self.layout.cell_count();
        if self.layout.is_known() {
            if let Some(cell) = cells.iter().find(|c| c.index as usize >= capacity) {
                return Err(Error::rejected(
                    "cells",
                    ResultCode::ValueOutOfRange,
                    format!("cell index {} exceeds layout {}", cell.index, self.layout),
                ));
            }
        }
        self.update("cells", cells, |d, v| d.cells = v).await
    }

    /// Cell at `index`, if the snapshot has one
    pub fn cell(&self, index: u32) -> Option<&MonitorCell> {
        self.cells.iter().find(|c| c.index == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::seeded;
    use serde_json::json;

    #[tokio::test]
    async fn test_layout_setter_rejects_unknown() {
        let (mock, mut monitor) =
            seeded::<MonitorData>("monitors/m1", json!({"name": "Wall", "layout": "2x2"})).await;

        let err = monitor.set_layout(MonitorLayout::Unknown).await.unwrap_err();
        assert_eq!(err.code(), ResultCode::InvalidValue);
        // rejected locally, nothing sent
        assert_eq!(mock.requests().len(), 1);

        monitor.set_layout(MonitorLayout::Cell3x3).await.unwrap();
        assert_eq!(monitor.layout, MonitorLayout::Cell3x3);
        assert_eq!(mock.get("monitors/m1").unwrap()["layout"], "3x3");
    }

    #[tokio::test]
    async fn test_cells_must_fit_layout() {
        let (_, mut monitor) = seeded::<MonitorData>("monitors/m2", json!({"layout": "1x2"})).await;
        let cell = |index| MonitorCell {
            index,
            data_source_id: "ds-1".parse().unwrap(),
            ..Default::default()
        };

        let err = monitor.set_cells(vec![cell(0), cell(2)]).await.unwrap_err();
        assert_eq!(err.code(), ResultCode::ValueOutOfRange);

        monitor.set_cells(vec![cell(0), cell(1)]).await.unwrap();
        assert_eq!(monitor.cell(1).unwrap().data_source_id, "ds-1");
    }

    #[tokio::test]
    async fn test_setter_does_not_touch_other_fields() {
        let (mock, mut monitor) =
            seeded::<MonitorData>("monitors/m3", json!({"name": "Desk", "number": 4})).await;
        mock.update_field("monitors/m3", "number", json!(9));

        monitor.set_name("Desk 2").await.unwrap();
        assert_eq!(monitor.name, "Desk 2");
        assert_eq!(monitor.number, 4);

        monitor.refresh().await.unwrap();
        assert_eq!(monitor.number, 9);
        assert!(monitor.layout.as_str() == "unknown");
    }
}
