use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Json, Router, async_trait,
    extract::{
        FromRequest, FromRequestParts, Path, Request, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::request::Parts,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    BoardView, DragEnd, DropTarget, DropTargetParseError, ExportError, HttpConfig, LinkParseError, LinkParser,
    MockLinkParser, Place, PlaceDraft, PlaceId, Project, ProjectId, ProjectSummary, TripSnapshot,
    TripStore, ValidationError, apply_drag_end, itinerary_csv_string, validate_place,
    validate_place_draft, validate_project_input,
};

pub type SharedLinkParser = Arc<Mutex<Box<dyn LinkParser + Send>>>;

#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<TripStore>>,
    link_parser: SharedLinkParser,
    link_parse_delay: Duration,
}

impl AppState {
    pub fn new(store: TripStore) -> Self {
        Self::with_shared(Arc::new(RwLock::new(store)))
    }

    pub fn with_shared(store: Arc<RwLock<TripStore>>) -> Self {
        Self {
            store,
            link_parser: Arc::new(Mutex::new(Box::new(MockLinkParser::new()))),
            link_parse_delay: Duration::ZERO,
        }
    }

    pub fn with_link_parser<P>(mut self, parser: P, delay: Duration) -> Self
    where
        P: LinkParser + Send + 'static,
    {
        self.link_parser = Arc::new(Mutex::new(Box::new(parser)));
        self.link_parse_delay = delay;
        self
    }

    pub fn store(&self) -> Arc<RwLock<TripStore>> {
        self.store.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    fn project_not_found(project_id: &ProjectId) -> Self {
        Self::not_found(format!("project {project_id} not found"))
    }

    fn place_not_found(place_id: &PlaceId) -> Self {
        Self::not_found(format!("place {place_id} not found"))
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<LinkParseError> for ApiError {
    fn from(value: LinkParseError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(value: ExportError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl From<DropTargetParseError> for ApiError {
    fn from(value: DropTargetParseError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::Invalid(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        ApiError::Invalid(value.body_text())
    }
}

/// `Json` whose rejections render as [`ApiError`].
struct ApiJson<T>(T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// `Path` whose rejections render as [`ApiError`].
struct ApiPath<T>(T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                tracing::error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct CreateProjectPayload {
    name: String,
    duration: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentProjectPayload {
    project_id: ProjectId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CurrentProjectBody {
    project_id: Option<ProjectId>,
    project: Option<Arc<Project>>,
}

#[derive(Debug, Deserialize)]
struct DropPayload {
    /// Droppable id: `day-<n>` or a place id.
    target: String,
}

#[derive(Debug, Serialize)]
struct DropOutcome {
    moved: bool,
    place: Place,
}

#[derive(Debug, Deserialize)]
struct LinkPayload {
    link: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/state", get(get_state))
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:project_id",
            get(get_project).delete(delete_project),
        )
        .route("/projects/:project_id/board", get(get_board))
        .route("/projects/:project_id/summary", get(get_summary))
        .route("/projects/:project_id/itinerary.csv", get(get_itinerary_csv))
        .route("/projects/:project_id/places", post(add_place))
        .route(
            "/projects/:project_id/places/:place_id",
            put(update_place).delete(delete_place),
        )
        .route(
            "/projects/:project_id/places/:place_id/drop",
            post(drop_place),
        )
        .route("/current", get(get_current).put(set_current))
        .route("/links/parse", post(parse_link))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: HttpConfig, store: TripStore) -> std::io::Result<()> {
    let state = AppState::new(store)
        .with_link_parser(MockLinkParser::new(), config.link_parse_delay);
    serve_state(config.addr, state).await
}

pub async fn serve_state(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "trip planner HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_state(State(state): State<AppState>) -> Json<TripSnapshot> {
    let snapshot = state.store.read().snapshot();
    Json(snapshot)
}

async fn list_projects(State(state): State<AppState>) -> Json<Vec<Arc<Project>>> {
    let projects = state.store.read().projects().to_vec();
    Json(projects)
}

async fn create_project(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateProjectPayload>,
) -> Result<(StatusCode, Json<Arc<Project>>), ApiError> {
    validate_project_input(&payload.name, payload.duration)?;
    let created = {
        let mut guard = state.store.write();
        let project_id = guard.create_project(payload.name.trim(), payload.duration);
        guard
            .project(&project_id)
            .ok_or_else(|| ApiError::internal("project not found after creation"))?
    };
    tracing::info!(project_id = %created.id, "created project");
    Ok((StatusCode::CREATED, Json(created)))
}

fn find_project(state: &AppState, project_id: &ProjectId) -> Result<Arc<Project>, ApiError> {
    state
        .store
        .read()
        .project(project_id)
        .ok_or_else(|| ApiError::project_not_found(project_id))
}

async fn get_project(
    State(state): State<AppState>,
    ApiPath(project_id): ApiPath<ProjectId>,
) -> Result<Json<Arc<Project>>, ApiError> {
    find_project(&state, &project_id).map(Json)
}

async fn delete_project(
    State(state): State<AppState>,
    ApiPath(project_id): ApiPath<ProjectId>,
) -> Result<StatusCode, ApiError> {
    let mut guard = state.store.write();
    if guard.project(&project_id).is_none() {
        return Err(ApiError::project_not_found(&project_id));
    }
    guard.delete_project(&project_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn get_board(
    State(state): State<AppState>,
    ApiPath(project_id): ApiPath<ProjectId>,
) -> Result<Json<BoardView>, ApiError> {
    let project = find_project(&state, &project_id)?;
    Ok(Json(BoardView::for_project(&project)))
}

async fn get_summary(
    State(state): State<AppState>,
    ApiPath(project_id): ApiPath<ProjectId>,
) -> Result<Json<ProjectSummary>, ApiError> {
    let project = find_project(&state, &project_id)?;
    Ok(Json(project.summary()))
}

async fn get_itinerary_csv(
    State(state): State<AppState>,
    ApiPath(project_id): ApiPath<ProjectId>,
) -> Result<Response, ApiError> {
    let project = find_project(&state, &project_id)?;
    let body = itinerary_csv_string(&project)?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], body).into_response())
}

async fn add_place(
    State(state): State<AppState>,
    ApiPath(project_id): ApiPath<ProjectId>,
    ApiJson(draft): ApiJson<PlaceDraft>,
) -> Result<(StatusCode, Json<Place>), ApiError> {
    let mut guard = state.store.write();
    let project = guard
        .project(&project_id)
        .ok_or_else(|| ApiError::project_not_found(&project_id))?;
    validate_place_draft(&draft, project.duration)?;

    let place_id = guard
        .add_place(&project_id, draft)
        .ok_or_else(|| ApiError::internal("place was not added"))?;
    let place = guard
        .place(&project_id, &place_id)
        .ok_or_else(|| ApiError::internal("place not found after creation"))?;
    Ok((StatusCode::CREATED, Json(place)))
}

async fn update_place(
    State(state): State<AppState>,
    ApiPath((project_id, place_id)): ApiPath<(ProjectId, PlaceId)>,
    ApiJson(place): ApiJson<Place>,
) -> Result<Json<Place>, ApiError> {
    if place.id != place_id {
        return Err(ApiError::invalid(
            "place id in payload does not match path parameter",
        ));
    }
    let mut guard = state.store.write();
    let project = guard
        .project(&project_id)
        .ok_or_else(|| ApiError::project_not_found(&project_id))?;
    if project.place(&place_id).is_none() {
        return Err(ApiError::place_not_found(&place_id));
    }
    validate_place(&place, project.duration)?;

    guard.update_place(&project_id, place);
    guard
        .place(&project_id, &place_id)
        .map(Json)
        .ok_or_else(|| ApiError::internal("place not found after update"))
}

async fn delete_place(
    State(state): State<AppState>,
    ApiPath((project_id, place_id)): ApiPath<(ProjectId, PlaceId)>,
) -> Result<StatusCode, ApiError> {
    let mut guard = state.store.write();
    if guard.place(&project_id, &place_id).is_none() {
        return Err(ApiError::place_not_found(&place_id));
    }
    guard.delete_place(&project_id, &place_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn drop_place(
    State(state): State<AppState>,
    ApiPath((project_id, place_id)): ApiPath<(ProjectId, PlaceId)>,
    ApiJson(payload): ApiJson<DropPayload>,
) -> Result<Json<DropOutcome>, ApiError> {
    let target: DropTarget = payload.target.parse()?;
    let mut guard = state.store.write();
    let project = guard
        .project(&project_id)
        .ok_or_else(|| ApiError::project_not_found(&project_id))?;
    if project.place(&place_id).is_none() {
        return Err(ApiError::place_not_found(&place_id));
    }
    match target {
        DropTarget::Day(day) if !project.contains_day(day) => {
            return Err(ValidationError::DayOutOfRange {
                day_index: day,
                duration: project.duration,
            }
            .into());
        }
        DropTarget::Place(over) if project.place(&over).is_none() => {
            return Err(ApiError::place_not_found(&over));
        }
        _ => {}
    }

    let drag = DragEnd {
        active: place_id,
        over: Some(target),
    };
    let moved = apply_drag_end(&mut guard, &project_id, &drag);
    let place = guard
        .place(&project_id, &place_id)
        .ok_or_else(|| ApiError::internal("place not found after drop"))?;
    Ok(Json(DropOutcome { moved, place }))
}

fn current_body(store: &TripStore) -> CurrentProjectBody {
    CurrentProjectBody {
        project_id: store.current_project_id(),
        project: store.current_project(),
    }
}

async fn get_current(State(state): State<AppState>) -> Json<CurrentProjectBody> {
    let body = current_body(&state.store.read());
    Json(body)
}

async fn set_current(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CurrentProjectPayload>,
) -> Json<CurrentProjectBody> {
    let mut guard = state.store.write();
    guard.set_current_project(payload.project_id);
    Json(current_body(&guard))
}

async fn parse_link(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LinkPayload>,
) -> Result<Json<PlaceDraft>, ApiError> {
    if !state.link_parse_delay.is_zero() {
        tokio::time::sleep(state.link_parse_delay).await;
    }
    let draft = state.link_parser.lock().parse(&payload.link)?;
    Ok(Json(draft))
}
