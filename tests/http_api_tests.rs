#![cfg(feature = "http_api")]

use std::time::Duration;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;
use trip_planner::{MockLinkParser, Place, PlaceId, ProjectId, TripStore, http_api};

fn new_router() -> axum::Router {
    let state = http_api::AppState::new(TripStore::new())
        .with_link_parser(MockLinkParser::seeded(11), Duration::ZERO);
    http_api::router(state)
}

async fn send(app: &axum::Router, method: &str, uri: &str, payload: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match payload {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_trip(app: &axum::Router, name: &str, duration: u32) -> ProjectId {
    let (status, body) = send(
        app,
        "POST",
        "/projects",
        Some(json!({ "name": name, "duration": duration })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_value(body["id"].clone()).unwrap()
}

#[tokio::test]
async fn trip_lifecycle_via_http_api() {
    let app = new_router();

    let project_id = create_trip(&app, "Jeju Trip", 4).await;

    let (status, body) = send(&app, "GET", &format!("/projects/{project_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Jeju Trip");
    assert_eq!(body["duration"], 4);
    assert_eq!(body["places"], json!([]));

    let (status, body) = send(&app, "GET", "/projects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &format!("/projects/{project_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/projects/{project_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("not_found"));
}

#[tokio::test]
async fn create_trip_rejects_invalid_duration() {
    let app = new_router();

    let (status, body) = send(
        &app,
        "POST",
        "/projects",
        Some(json!({ "name": "Too Long", "duration": 31 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_request"));

    let (_, body) = send(&app, "GET", "/projects", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn places_are_added_moved_and_shown_on_board() {
    let app = new_router();
    let project_id = create_trip(&app, "Jeju Trip", 3).await;
    let places_uri = format!("/projects/{project_id}/places");

    let (status, beach) = send(
        &app,
        "POST",
        &places_uri,
        Some(json!({ "name": "Hamdeok Beach", "category": "Beach", "dayIndex": 0, "cost": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let beach_id: PlaceId = serde_json::from_value(beach["id"].clone()).unwrap();

    let (status, cafe) = send(
        &app,
        "POST",
        &places_uri,
        Some(json!({ "name": "Sunset Cafe", "category": "Cafe", "dayIndex": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let cafe_id: PlaceId = serde_json::from_value(cafe["id"].clone()).unwrap();

    // dropped on a day column
    let (status, body) = send(
        &app,
        "POST",
        &format!("{places_uri}/{beach_id}/drop"),
        Some(json!({ "target": "day-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["moved"], json!(true));
    assert_eq!(body["place"]["dayIndex"], 1);

    // dropped onto another card
    let (status, body) = send(
        &app,
        "POST",
        &format!("{places_uri}/{beach_id}/drop"),
        Some(json!({ "target": cafe_id.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["place"]["dayIndex"], 2);

    // same column again
    let (_, body) = send(
        &app,
        "POST",
        &format!("{places_uri}/{beach_id}/drop"),
        Some(json!({ "target": "day-2" })),
    )
    .await;
    assert_eq!(body["moved"], json!(false));

    let (status, board) = send(&app, "GET", &format!("/projects/{project_id}/board"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["columns"].as_array().unwrap().len(), 3);
    assert_eq!(board["columns"][0]["places"], json!([]));
    let last_day: Vec<&str> = board["columns"][2]["places"]
        .as_array()
        .unwrap()
        .iter()
        .map(|place| place["name"].as_str().unwrap())
        .collect();
    assert_eq!(last_day, vec!["Hamdeok Beach", "Sunset Cafe"]);

    let (status, summary) =
        send(&app, "GET", &format!("/projects/{project_id}/summary"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["placeCount"], 2);
    assert_eq!(summary["dayCounts"], json!([0, 0, 2]));
}

#[tokio::test]
async fn drop_rejects_targets_outside_the_trip() {
    let app = new_router();
    let project_id = create_trip(&app, "Short", 2).await;
    let places_uri = format!("/projects/{project_id}/places");
    let (_, place) = send(
        &app,
        "POST",
        &places_uri,
        Some(json!({ "name": "Market", "category": "Restaurant", "dayIndex": 0 })),
    )
    .await;
    let place_id = place["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("{places_uri}/{place_id}/drop"),
        Some(json!({ "target": "day-5" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        &format!("{places_uri}/{place_id}/drop"),
        Some(json!({ "target": PlaceId::new().to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        &format!("{places_uri}/{place_id}/drop"),
        Some(json!({ "target": "sideways" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_request"));
    assert!(body["message"].as_str().unwrap().contains("sideways"));
}

#[tokio::test]
async fn malformed_requests_use_the_error_body() {
    let app = new_router();

    let (status, body) = send(&app, "GET", "/projects/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_request"));
    assert!(body["message"].is_string());

    let (status, body) = send(&app, "POST", "/projects", Some(json!({ "name": "A" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_request"));
    assert!(body["message"].as_str().unwrap().contains("duration"));

    let project_id = create_trip(&app, "Jeju Trip", 2).await;
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/projects/{project_id}/places/42"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_request"));
}

#[tokio::test]
async fn update_and_delete_place_via_http_api() {
    let app = new_router();
    let project_id = create_trip(&app, "Jeju Trip", 2).await;
    let places_uri = format!("/projects/{project_id}/places");
    let (_, created) = send(
        &app,
        "POST",
        &places_uri,
        Some(json!({ "name": "Cafe", "category": "Cafe", "dayIndex": 0, "memo": "window seat" })),
    )
    .await;
    let mut place: Place = serde_json::from_value(created).unwrap();
    let place_uri = format!("{places_uri}/{}", place.id);

    place.name = "Sunset Cafe".into();
    place.memo = None;
    place.time = Some("18:00".into());
    let (status, body) = send(
        &app,
        "PUT",
        &place_uri,
        Some(serde_json::to_value(&place).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Sunset Cafe");
    assert!(body.get("memo").is_none());

    let mut mismatched = place.clone();
    mismatched.id = PlaceId::new();
    let (status, _) = send(
        &app,
        "PUT",
        &place_uri,
        Some(serde_json::to_value(&mismatched).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut late = place.clone();
    late.day_index = 9;
    let (status, body) = send(&app, "PUT", &place_uri, Some(serde_json::to_value(&late).unwrap())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid_request"));

    let (status, _) = send(&app, "DELETE", &place_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &place_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn current_project_tracks_deletion() {
    let app = new_router();
    let project_id = create_trip(&app, "Jeju Trip", 2).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/current",
        Some(json!({ "projectId": project_id.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["projectId"], json!(project_id.to_string()));
    assert_eq!(body["project"]["name"], "Jeju Trip");

    send(&app, "DELETE", &format!("/projects/{project_id}"), None).await;

    let (_, body) = send(&app, "GET", "/current", None).await;
    assert_eq!(body["projectId"], Value::Null);
    assert_eq!(body["project"], Value::Null);

    let (_, state) = send(&app, "GET", "/state", None).await;
    assert_eq!(state["projects"], json!([]));
    assert_eq!(state["currentProjectId"], Value::Null);
}

#[tokio::test]
async fn itinerary_csv_is_served_as_text() {
    let app = new_router();
    let project_id = create_trip(&app, "Jeju Trip", 2).await;
    send(
        &app,
        "POST",
        &format!("/projects/{project_id}/places"),
        Some(json!({ "name": "Hamdeok Beach", "category": "Beach", "dayIndex": 1 })),
    )
    .await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/projects/{project_id}/itinerary.csv"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/csv; charset=utf-8"
    );
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("day,day_index"));
    assert!(text.contains("Day 2,1,,Hamdeok Beach,Beach"));
}

#[tokio::test]
async fn link_parse_returns_reviewable_draft() {
    let app = new_router();

    let (status, draft) = send(
        &app,
        "POST",
        "/links/parse",
        Some(json!({ "link": "https://naver.me/abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["dayIndex"], 0);
    assert_eq!(draft["link"], "https://naver.me/abc");
    assert_eq!(draft["time"], "10:00");
    assert!(draft["lat"].as_f64().unwrap() >= 33.3);

    let (status, body) = send(&app, "POST", "/links/parse", Some(json!({ "link": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "link must not be empty");
}

#[tokio::test]
async fn unknown_project_routes_return_not_found() {
    let app = new_router();
    let ghost = ProjectId::new();

    for uri in [
        format!("/projects/{ghost}/board"),
        format!("/projects/{ghost}/summary"),
        format!("/projects/{ghost}/itinerary.csv"),
    ] {
        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    let (status, _) = send(
        &app,
        "POST",
        &format!("/projects/{ghost}/places"),
        Some(json!({ "name": "Cafe", "category": "Cafe", "dayIndex": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
