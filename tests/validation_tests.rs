use trip_planner::{
    MAX_TRIP_DAYS, Place, PlaceDraft, PlaceId, ValidationError, validate_place,
    validate_place_draft, validate_project_input,
};

#[test]
fn trip_input_requires_name_and_day_range() {
    assert!(validate_project_input("Jeju Trip", 4).is_ok());
    assert!(validate_project_input("Jeju Trip", 1).is_ok());
    assert!(validate_project_input("Jeju Trip", MAX_TRIP_DAYS).is_ok());

    assert_eq!(
        validate_project_input("   ", 4),
        Err(ValidationError::EmptyTripName)
    );
    assert_eq!(
        validate_project_input("Jeju Trip", 0),
        Err(ValidationError::DurationOutOfRange(0))
    );
    assert_eq!(
        validate_project_input("Jeju Trip", 31),
        Err(ValidationError::DurationOutOfRange(31))
    );
}

#[test]
fn duration_error_message_names_the_bounds() {
    let err = validate_project_input("Jeju Trip", 45).unwrap_err();
    assert_eq!(
        err.to_string(),
        "trip duration 45 must be between 1 and 30 days"
    );
}

#[test]
fn place_draft_accepts_typical_input() {
    let draft = PlaceDraft::new("Sunset Cafe", "Cafe", 2)
        .with_time("18:30")
        .with_cost(12000.0)
        .with_coordinates(33.4, 126.6);
    assert!(validate_place_draft(&draft, 3).is_ok());
}

#[test]
fn place_draft_rejects_bad_fields() {
    let base = PlaceDraft::new("Sunset Cafe", "Cafe", 0);

    let mut empty_name = base.clone();
    empty_name.name = " ".into();
    assert_eq!(
        validate_place_draft(&empty_name, 3),
        Err(ValidationError::EmptyPlaceName)
    );

    let mut empty_category = base.clone();
    empty_category.category = String::new();
    assert_eq!(
        validate_place_draft(&empty_category, 3),
        Err(ValidationError::EmptyCategory)
    );

    assert!(matches!(
        validate_place_draft(&base.clone().with_cost(-1.0), 3),
        Err(ValidationError::InvalidCost(_))
    ));
    assert!(matches!(
        validate_place_draft(&base.clone().with_cost(f64::NAN), 3),
        Err(ValidationError::InvalidCost(_))
    ));
    assert_eq!(
        validate_place_draft(&base.clone().with_time("25:00"), 3),
        Err(ValidationError::InvalidTime("25:00".into()))
    );
    assert!(matches!(
        validate_place_draft(&base.clone().with_coordinates(95.0, 10.0), 3),
        Err(ValidationError::InvalidCoordinates { .. })
    ));
}

#[test]
fn day_index_must_fall_inside_the_trip() {
    let last_day = PlaceDraft::new("Airport", "Activity", 2);
    assert!(validate_place_draft(&last_day, 3).is_ok());

    let past_end = PlaceDraft::new("Airport", "Activity", 3);
    assert_eq!(
        validate_place_draft(&past_end, 3),
        Err(ValidationError::DayOutOfRange {
            day_index: 3,
            duration: 3
        })
    );

    let negative = Place::new(PlaceId::new(), "Airport", "Activity", -1);
    assert!(matches!(
        validate_place(&negative, 3),
        Err(ValidationError::DayOutOfRange { day_index: -1, .. })
    ));
}
