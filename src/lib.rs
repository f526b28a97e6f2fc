pub mod board;
pub mod config;
pub mod export;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod ids;
pub mod link_parser;
pub mod logging;
pub mod place;
pub mod project;
pub mod store;
pub mod validation;

pub use board::{BoardView, DayColumn, DragEnd, DropTarget, DropTargetParseError, apply_drag_end};
pub use config::{ConfigError, HttpConfig};
pub use export::{
    ExportError, itinerary_csv_string, write_itinerary_csv, write_snapshot_json,
};
pub use ids::{PlaceId, ProjectId};
pub use link_parser::{LinkParseError, LinkParser, MockLinkParser};
pub use place::{Place, PlaceDraft};
pub use project::{Project, ProjectSummary};
pub use store::{SubscriptionId, TripSnapshot, TripStore};
pub use validation::{
    MAX_TRIP_DAYS, ValidationError, validate_place, validate_place_draft, validate_project_input,
};
