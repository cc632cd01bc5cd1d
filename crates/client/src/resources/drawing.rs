//! Drawings (site maps) and the markers placed on them

use serde::{Deserialize, Serialize};

use vxsdk_common::{
    Collection, CollectionQuery, Error, FilterKey, Id, MarkerType, Name, NewMarker, Result,
    ResultCode,
};

use super::resource_data;
use crate::handle::{ensure_known, Handle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawingData {
    pub id: Id,
    pub name: Name,
    pub image_id: Id,
}

resource_data!(DrawingData, "drawings");

pub type Drawing = Handle<DrawingData>;

/// An item placed on a drawing.
///
/// `x` and `y` are normalized to the image: 0.0 is the left or top edge,
/// 1.0 the right or bottom edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkerData {
    pub id: Id,
    pub name: Name,
    #[serde(rename = "type")]
    pub marker_type: MarkerType,
    pub x: f32,
    pub y: f32,
    pub linked_id: Id,
}

resource_data!(MarkerData, "markers");

pub type Marker = Handle<MarkerData>;

/// Filters accepted by [`Drawing::markers`]
pub const MARKER_FILTERS: &[FilterKey] = &[FilterKey::Name, FilterKey::Type, FilterKey::Linked];

fn check_coordinate(field: &str, value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::rejected(field, ResultCode::ValueOutOfRange, format!("{} is outside 0..=1", value)));
    }
    Ok(())
}

impl Handle<DrawingData> {
    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        let name = Name::for_field("name", name)?;
        self.update("name", name, |d, v| d.name = v).await
    }

    pub async fn markers(&self, query: &CollectionQuery) -> Result<Collection<Handle<MarkerData>>> {
        self.owned_collection(query, MARKER_FILTERS).await
    }

    pub async fn marker(&self, id: &str) -> Result<Handle<MarkerData>> {
        self.owned(id).await
    }

    pub async fn add_marker(&mut self, marker: &NewMarker) -> Result<Handle<MarkerData>> {
        check_coordinate("x", marker.x)?;
        check_coordinate("y", marker.y)?;
        ensure_known("type", marker.marker_type)?;
        self.create_owned(marker).await
    }
}

impl Handle<MarkerData> {
    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        let name = Name::for_field("name", name)?;
        self.update("name", name, |d, v| d.name = v).await
    }

    pub async fn set_x(&mut self, x: f32) -> Result<()> {
        check_coordinate("x", x)?;
        self.update("x", x, |d, v| d.x = v).await
    }

    pub async fn set_y(&mut self, y: f32) -> Result<()> {
        check_coordinate("y", y)?;
        self.update("y", y, |d, v| d.y = v).await
    }

    pub async fn set_marker_type(&mut self, marker_type: MarkerType) -> Result<()> {
        let marker_type = ensure_known("type", marker_type)?;
        self.update("type", marker_type, |d, v| d.marker_type = v).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::seeded;
    use serde_json::json;

    #[tokio::test]
    async fn test_markers_live_under_drawing() {
        let (mock, mut drawing) =
            seeded::<DrawingData>("drawings/d1", json!({"name": "Ground floor", "imageId": "img-1"})).await;

        let new_marker = NewMarker {
            name: "Entrance cam".parse().unwrap(),
            marker_type: MarkerType::Camera,
            x: 0.25,
            y: 0.5,
            linked_id: "dev-1".parse().unwrap(),
        };
        let mut marker = drawing.add_marker(&new_marker).await.unwrap();
        assert!(marker.path().starts_with("drawings/d1/markers/"));
        assert_eq!(marker.marker_type, MarkerType::Camera);

        marker.set_x(0.75).await.unwrap();
        assert_eq!(mock.get(marker.path()).unwrap()["x"], 0.75);

        let listed = drawing.markers(&CollectionQuery::new()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.items[0].x, 0.75);
    }

    #[tokio::test]
    async fn test_coordinates_must_be_normalized() {
        let (mock, mut drawing) = seeded::<DrawingData>("drawings/d2", json!({"name": "Roof"})).await;
        let outside = NewMarker {
            y: 1.5,
            ..Default::default()
        };
        let err = drawing.add_marker(&outside).await.unwrap_err();
        assert_eq!(err.code(), ResultCode::ValueOutOfRange);
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_marker_needs_known_type() {
        let (mock, mut drawing) = seeded::<DrawingData>("drawings/d3", json!({"name": "Lot"})).await;
        let untyped = NewMarker {
            x: 0.5,
            y: 0.5,
            ..Default::default()
        };
        let err = drawing.add_marker(&untyped).await.unwrap_err();
        assert_eq!(err.code(), ResultCode::InvalidValue);
        assert_eq!(mock.requests().len(), 1);
    }
}
