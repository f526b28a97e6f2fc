use crate::board::day_label;
use crate::place::Place;
use crate::project::Project;
use crate::store::TripSnapshot;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Default, Serialize)]
struct ItineraryCsvRecord {
    day: String,
    day_index: i32,
    time: String,
    name: String,
    category: String,
    cost: String,
    memo: String,
    address: String,
    link: String,
    lat: String,
    lng: String,
    media: String,
    place_id: String,
}

impl ItineraryCsvRecord {
    fn from_place(project: &Project, place: &Place) -> Self {
        let day = if project.contains_day(place.day_index) {
            day_label(project, place.day_index)
        } else {
            String::new()
        };
        Self {
            day,
            day_index: place.day_index,
            time: place.time.clone().unwrap_or_default(),
            name: place.name.clone(),
            category: place.category.clone(),
            cost: format_option_f64(place.cost),
            memo: place.memo.clone().unwrap_or_default(),
            address: place.address.clone().unwrap_or_default(),
            link: place.link.clone().unwrap_or_default(),
            lat: format_option_f64(place.lat),
            lng: format_option_f64(place.lng),
            media: join_strings(&place.media),
            place_id: place.id.to_string(),
        }
    }
}

/// Writes one row per place, ordered by day and then by insertion order.
/// Places outside the trip's days keep their raw index and an empty day label.
pub fn write_itinerary_csv<W: Write>(project: &Project, writer: W) -> ExportResult<()> {
    let mut places: Vec<&Place> = project.places.iter().collect();
    places.sort_by_key(|place| place.day_index);

    let mut writer = csv::Writer::from_writer(writer);
    if places.is_empty() {
        writer.write_record(ITINERARY_HEADER)?;
    }
    for place in places {
        writer.serialize(ItineraryCsvRecord::from_place(project, place))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn itinerary_csv_string(project: &Project) -> ExportResult<String> {
    let mut buffer = Vec::new();
    write_itinerary_csv(project, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn write_snapshot_json<W: Write>(snapshot: &TripSnapshot, writer: W) -> ExportResult<()> {
    serde_json::to_writer_pretty(writer, snapshot)?;
    Ok(())
}

const ITINERARY_HEADER: [&str; 13] = [
    "day", "day_index", "time", "name", "category", "cost", "memo", "address", "link", "lat",
    "lng", "media", "place_id",
];

fn format_option_f64(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn join_strings(values: &[String]) -> String {
    values.join(";")
}
