use crate::place::{Place, PlaceDraft};
use chrono::NaiveTime;

pub const MIN_TRIP_DAYS: u32 = 1;
pub const MAX_TRIP_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("trip name must not be empty")]
    EmptyTripName,
    #[error(
        "trip duration {0} must be between {min} and {max} days",
        min = MIN_TRIP_DAYS,
        max = MAX_TRIP_DAYS
    )]
    DurationOutOfRange(u32),
    #[error("place name must not be empty")]
    EmptyPlaceName,
    #[error("place category must not be empty")]
    EmptyCategory,
    #[error("day index {day_index} is outside a {duration}-day trip")]
    DayOutOfRange { day_index: i32, duration: u32 },
    #[error("invalid cost {0} (must be a non-negative number)")]
    InvalidCost(f64),
    #[error("invalid time '{0}' (expected HH:MM)")]
    InvalidTime(String),
    #[error("invalid coordinates lat={lat} lng={lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },
}

pub fn validate_project_input(name: &str, duration: u32) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyTripName);
    }
    if !(MIN_TRIP_DAYS..=MAX_TRIP_DAYS).contains(&duration) {
        return Err(ValidationError::DurationOutOfRange(duration));
    }
    Ok(())
}

pub fn validate_place_draft(draft: &PlaceDraft, duration: u32) -> Result<(), ValidationError> {
    let fields = PlaceFields {
        name: &draft.name,
        category: &draft.category,
        day_index: draft.day_index,
        time: draft.time.as_deref(),
        cost: draft.cost,
        lat: draft.lat,
        lng: draft.lng,
    };
    validate_fields(fields, duration)
}

pub fn validate_place(place: &Place, duration: u32) -> Result<(), ValidationError> {
    let fields = PlaceFields {
        name: &place.name,
        category: &place.category,
        day_index: place.day_index,
        time: place.time.as_deref(),
        cost: place.cost,
        lat: place.lat,
        lng: place.lng,
    };
    validate_fields(fields, duration)
}

struct PlaceFields<'a> {
    name: &'a str,
    category: &'a str,
    day_index: i32,
    time: Option<&'a str>,
    cost: Option<f64>,
    lat: Option<f64>,
    lng: Option<f64>,
}

fn validate_fields(fields: PlaceFields<'_>, duration: u32) -> Result<(), ValidationError> {
    if fields.name.trim().is_empty() {
        return Err(ValidationError::EmptyPlaceName);
    }
    if fields.category.trim().is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    if fields.day_index < 0 || fields.day_index as i64 >= duration as i64 {
        return Err(ValidationError::DayOutOfRange {
            day_index: fields.day_index,
            duration,
        });
    }
    if let Some(cost) = fields.cost {
        if !cost.is_finite() || cost < 0.0 {
            return Err(ValidationError::InvalidCost(cost));
        }
    }
    if let Some(time) = fields.time {
        if NaiveTime::parse_from_str(time.trim(), "%H:%M").is_err() {
            return Err(ValidationError::InvalidTime(time.to_string()));
        }
    }
    let lat = fields.lat.unwrap_or(0.0);
    let lng = fields.lng.unwrap_or(0.0);
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(ValidationError::InvalidCoordinates { lat, lng });
    }
    Ok(())
}
