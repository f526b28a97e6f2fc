use crate::ids::PlaceId;
use serde::{Deserialize, Serialize};

/// A point of interest assigned to one day of a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub category: String,
    /// Zero-based day bucket. The store keeps whatever value it is given.
    pub day_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Free-form "HH:MM"; not used for ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// Opaque attachment references, in the order they were added.
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl Place {
    pub fn new(
        id: PlaceId,
        name: impl Into<String>,
        category: impl Into<String>,
        day_index: i32,
    ) -> Self {
        PlaceDraft::new(name, category, day_index).into_place(id)
    }

    /// Copy of this place moved to another day bucket.
    pub fn with_day_index(&self, day_index: i32) -> Self {
        Self {
            day_index,
            ..self.clone()
        }
    }

    pub fn cost_or_zero(&self) -> f64 {
        self.cost.unwrap_or(0.0)
    }
}

/// Everything a new place carries before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDraft {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub day_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl PlaceDraft {
    pub fn new(name: impl Into<String>, category: impl Into<String>, day_index: i32) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            day_index,
            address: None,
            link: None,
            time: None,
            cost: None,
            memo: None,
            media: Vec::new(),
            lat: None,
            lng: None,
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    pub fn into_place(self, id: PlaceId) -> Place {
        Place {
            id,
            name: self.name,
            category: self.category,
            day_index: self.day_index,
            address: self.address,
            link: self.link,
            time: self.time,
            cost: self.cost,
            memo: self.memo,
            media: self.media,
            lat: self.lat,
            lng: self.lng,
        }
    }
}
