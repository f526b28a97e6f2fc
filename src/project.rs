use crate::ids::{PlaceId, ProjectId};
use crate::place::Place;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Durations beyond this only list days that hold places.
const MAX_SUMMARY_DAYS: i32 = 366;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// Number of days the trip spans (3 nights 4 days = 4).
    pub duration: u32,
    #[serde(default)]
    pub places: Vec<Place>,
    /// Display-only; no store operation changes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub place_count: usize,
    pub day_counts: Vec<usize>,
    pub unscheduled_count: usize,
    pub total_cost: f64,
}

impl ProjectSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("places={}", self.place_count));
        if !self.day_counts.is_empty() {
            let per_day = self
                .day_counts
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("/");
            parts.push(format!("per_day={}", per_day));
        }
        if self.unscheduled_count > 0 {
            parts.push(format!("unscheduled={}", self.unscheduled_count));
        }
        parts.push(format!("cost={}", self.total_cost));
        parts.join(", ")
    }
}

impl Project {
    pub fn new(id: ProjectId, name: impl Into<String>, duration: u32) -> Self {
        Self {
            id,
            name: name.into(),
            duration,
            places: Vec::new(),
            start_date: None,
        }
    }

    pub fn nights(&self) -> u32 {
        self.duration.saturating_sub(1)
    }

    pub fn duration_label(&self) -> String {
        format!("{} Nights {} Days", self.nights(), self.duration)
    }

    pub fn place(&self, place_id: &PlaceId) -> Option<&Place> {
        self.places.iter().find(|place| place.id == *place_id)
    }

    /// Places of one day bucket, in insertion order.
    pub fn places_on_day(&self, day_index: i32) -> impl Iterator<Item = &Place> + '_ {
        self.places
            .iter()
            .filter(move |place| place.day_index == day_index)
    }

    /// Number of day columns, saturated to the range a `day_index` can address.
    pub fn day_count(&self) -> i32 {
        i32::try_from(self.duration).unwrap_or(i32::MAX)
    }

    pub fn day_buckets(&self) -> Vec<Vec<&Place>> {
        (0..self.day_count())
            .map(|day| self.places_on_day(day).collect())
            .collect()
    }

    /// Places whose day index falls outside `0..duration`; no day column shows them.
    pub fn unscheduled_places(&self) -> impl Iterator<Item = &Place> + '_ {
        self.places
            .iter()
            .filter(move |place| !self.contains_day(place.day_index))
    }

    pub fn contains_day(&self, day_index: i32) -> bool {
        (0..self.day_count()).contains(&day_index)
    }

    pub fn total_cost(&self) -> f64 {
        self.places.iter().map(Place::cost_or_zero).sum()
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start_date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
    }

    /// Calendar date of a day bucket, when the start date is a valid `YYYY-MM-DD`.
    pub fn date_of_day(&self, day_index: i32) -> Option<NaiveDate> {
        self.start()
            .and_then(|start| start.checked_add_signed(Duration::days(day_index as i64)))
    }

    /// Places per day, sized by the furthest occupied day rather than the duration.
    fn day_counts(&self) -> Vec<usize> {
        let occupied = self
            .places
            .iter()
            .filter(|place| self.contains_day(place.day_index))
            .map(|place| place.day_index as usize + 1)
            .max()
            .unwrap_or(0);
        let columns = occupied.max(self.day_count().min(MAX_SUMMARY_DAYS) as usize);
        let mut counts = vec![0; columns];
        for place in self.places.iter().filter(|place| self.contains_day(place.day_index)) {
            counts[place.day_index as usize] += 1;
        }
        counts
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            place_count: self.places.len(),
            day_counts: self.day_counts(),
            unscheduled_count: self.unscheduled_places().count(),
            total_cost: self.total_cost(),
        }
    }
}
