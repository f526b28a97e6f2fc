//! Kanban board logic: day columns, drop targets, and day reassignment.
//!
//! Reassignment is not a store operation of its own. A drop computes a copy of
//! the dragged place with a new `day_index` and hands it to
//! [`TripStore::update_place`]. Position inside a day is never recorded, so a
//! moved place shows up in insertion order within its new column.

use crate::ids::{PlaceId, ProjectId};
use crate::place::Place;
use crate::project::Project;
use crate::store::TripStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DAY_TARGET_PREFIX: &str = "day-";

/// What a dragged place was released over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DropTarget {
    /// A day column's drop area.
    Day(i32),
    /// Another place card.
    Place(PlaceId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DropTargetParseError {
    #[error("invalid day column target '{0}'")]
    InvalidDay(String),
    #[error("drop target '{0}' is neither a day column nor a place id")]
    Unknown(String),
}

impl FromStr for DropTarget {
    type Err = DropTargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if let Some(day) = raw.strip_prefix(DAY_TARGET_PREFIX) {
            return day
                .parse::<i32>()
                .map(DropTarget::Day)
                .map_err(|_| DropTargetParseError::InvalidDay(raw.to_string()));
        }
        raw.parse::<PlaceId>()
            .map(DropTarget::Place)
            .map_err(|_| DropTargetParseError::Unknown(raw.to_string()))
    }
}

impl TryFrom<String> for DropTarget {
    type Error = DropTargetParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for DropTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropTarget::Day(day) => write!(f, "{DAY_TARGET_PREFIX}{day}"),
            DropTarget::Place(place_id) => write!(f, "{place_id}"),
        }
    }
}

impl From<DropTarget> for String {
    fn from(value: DropTarget) -> Self {
        value.to_string()
    }
}

/// End of a drag gesture as reported by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnd {
    pub active: PlaceId,
    pub over: Option<DropTarget>,
}

/// Copy of the dragged place carrying its new day, or `None` when nothing
/// would change (unknown place, unknown target place, or same day).
pub fn reassigned_place(project: &Project, active: &PlaceId, target: &DropTarget) -> Option<Place> {
    let place = project.place(active)?;
    let day_index = match target {
        DropTarget::Day(day) => *day,
        DropTarget::Place(over) => project.place(over)?.day_index,
    };
    (place.day_index != day_index).then(|| place.with_day_index(day_index))
}

/// Applies a finished drag to the store. Returns whether a place changed day.
pub fn apply_drag_end(store: &mut TripStore, project_id: &ProjectId, drag: &DragEnd) -> bool {
    let Some(target) = drag.over.as_ref() else {
        tracing::debug!(place_id = %drag.active, "drag ended outside any target");
        return false;
    };
    let Some(project) = store.project(project_id) else {
        return false;
    };
    let Some(moved) = reassigned_place(&project, &drag.active, target) else {
        return false;
    };

    tracing::debug!(
        %project_id,
        place_id = %moved.id,
        %target,
        day_index = moved.day_index,
        "reassigning place"
    );
    store.update_place(project_id, moved);
    true
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayColumn {
    pub day_index: i32,
    pub label: String,
    /// Droppable id the UI registers for this column.
    pub target: String,
    pub places: Vec<Place>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub project_id: ProjectId,
    pub name: String,
    pub columns: Vec<DayColumn>,
    pub unscheduled: Vec<Place>,
}

impl BoardView {
    pub fn for_project(project: &Project) -> Self {
        let columns = (0..project.day_count())
            .map(|day_index| DayColumn {
                day_index,
                label: day_label(project, day_index),
                target: DropTarget::Day(day_index).to_string(),
                places: project.places_on_day(day_index).cloned().collect(),
            })
            .collect();

        Self {
            project_id: project.id,
            name: project.name.clone(),
            columns,
            unscheduled: project.unscheduled_places().cloned().collect(),
        }
    }
}

pub fn day_label(project: &Project, day_index: i32) -> String {
    match project.date_of_day(day_index) {
        Some(date) => format!("Day {} ({})", day_index + 1, date.format("%Y-%m-%d")),
        None => format!("Day {}", day_index + 1),
    }
}
