use crate::ids::{PlaceId, ProjectId};
use crate::place::{Place, PlaceDraft};
use crate::project::Project;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Immutable view of the whole trip state.
///
/// Cloning is cheap: projects are shared behind `Arc`s and a mutation only
/// replaces the outer vector and the one project it touched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSnapshot {
    projects: Arc<Vec<Arc<Project>>>,
    current_project_id: Option<ProjectId>,
    version: u64,
}

impl TripSnapshot {
    pub fn projects(&self) -> &[Arc<Project>] {
        &self.projects
    }

    pub fn project(&self, project_id: &ProjectId) -> Option<&Arc<Project>> {
        self.projects.iter().find(|project| project.id == *project_id)
    }

    /// The stored id, which may point at a project that no longer exists.
    pub fn current_project_id(&self) -> Option<ProjectId> {
        self.current_project_id
    }

    /// Resolves the current id against the live collection; a dangling id reads as none.
    pub fn current_project(&self) -> Option<&Arc<Project>> {
        self.current_project_id
            .as_ref()
            .and_then(|project_id| self.project(project_id))
    }

    /// Incremented by every mutation that changed state.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// True when both snapshots share the same project collection.
    pub fn shares_projects_with(&self, other: &TripSnapshot) -> bool {
        Arc::ptr_eq(&self.projects, &other.projects)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn Fn(&TripSnapshot) + Send + Sync>;

/// Owns the trip projects and every mutation over them.
///
/// All operations are total: an unknown project or place id is a silent no-op
/// that leaves the snapshot untouched.
#[derive(Default)]
pub struct TripStore {
    state: TripSnapshot,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for TripStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl TripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            state: TripSnapshot {
                projects: Arc::new(projects.into_iter().map(Arc::new).collect()),
                current_project_id: None,
                version: 0,
            },
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> TripSnapshot {
        self.state.clone()
    }

    pub fn state(&self) -> &TripSnapshot {
        &self.state
    }

    pub fn projects(&self) -> &[Arc<Project>] {
        self.state.projects()
    }

    pub fn project(&self, project_id: &ProjectId) -> Option<Arc<Project>> {
        self.state.project(project_id).cloned()
    }

    pub fn place(&self, project_id: &ProjectId, place_id: &PlaceId) -> Option<Place> {
        self.state
            .project(project_id)
            .and_then(|project| project.place(place_id).cloned())
    }

    pub fn current_project_id(&self) -> Option<ProjectId> {
        self.state.current_project_id()
    }

    pub fn current_project(&self) -> Option<Arc<Project>> {
        self.state.current_project().cloned()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&TripSnapshot) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }

    /// Appends a new, empty project. Name and duration are taken as given.
    pub fn create_project(&mut self, name: impl Into<String>, duration: u32) -> ProjectId {
        let project = Project::new(ProjectId::new(), name, duration);
        let project_id = project.id;
        tracing::debug!(%project_id, name = %project.name, duration, "creating project");

        let mut projects = Vec::clone(&self.state.projects);
        projects.push(Arc::new(project));
        self.commit(Arc::new(projects), self.state.current_project_id);
        project_id
    }

    /// Stores the id as-is; it is not checked against the collection.
    pub fn set_current_project(&mut self, project_id: ProjectId) {
        if self.state.current_project_id == Some(project_id) {
            return;
        }
        tracing::debug!(%project_id, "setting current project");
        self.commit(self.state.projects.clone(), Some(project_id));
    }

    pub fn delete_project(&mut self, project_id: &ProjectId) {
        if self.state.project(project_id).is_none() {
            tracing::debug!(%project_id, "delete skipped: project not found");
            return;
        }
        tracing::debug!(%project_id, "deleting project");

        let projects: Vec<Arc<Project>> = self
            .state
            .projects
            .iter()
            .filter(|project| project.id != *project_id)
            .cloned()
            .collect();
        let current = match self.state.current_project_id {
            Some(current) if current == *project_id => None,
            other => other,
        };
        self.commit(Arc::new(projects), current);
    }

    /// Adds a place with a fresh id. Returns `None`, leaving the state as it was,
    /// when the project does not exist.
    pub fn add_place(&mut self, project_id: &ProjectId, draft: PlaceDraft) -> Option<PlaceId> {
        let place_id = PlaceId::new();
        let added = self.update_project_with(project_id, |project| {
            tracing::debug!(%project_id, %place_id, day_index = draft.day_index, "adding place");
            project.places.push(draft.into_place(place_id));
            true
        });
        added.then_some(place_id)
    }

    /// Overwrites the place with the same id. A place id the project does not
    /// hold is dropped, never appended.
    pub fn update_place(&mut self, project_id: &ProjectId, place: Place) {
        self.update_project_with(project_id, |project| {
            match project.places.iter_mut().find(|existing| existing.id == place.id) {
                Some(existing) => {
                    tracing::debug!(%project_id, place_id = %place.id, "updating place");
                    *existing = place;
                    true
                }
                None => {
                    tracing::debug!(%project_id, place_id = %place.id, "update skipped: place not found");
                    false
                }
            }
        });
    }

    pub fn delete_place(&mut self, project_id: &ProjectId, place_id: &PlaceId) {
        self.update_project_with(project_id, |project| {
            let before = project.places.len();
            project.places.retain(|place| place.id != *place_id);
            let removed = project.places.len() != before;
            if removed {
                tracing::debug!(%project_id, %place_id, "deleted place");
            } else {
                tracing::debug!(%project_id, %place_id, "delete skipped: place not found");
            }
            removed
        });
    }

    /// Runs `mutator` on a copy of the project and swaps the copy in when the
    /// mutator reports a change. Sibling projects keep their `Arc`s.
    fn update_project_with<F>(&mut self, project_id: &ProjectId, mutator: F) -> bool
    where
        F: FnOnce(&mut Project) -> bool,
    {
        let Some(idx) = self
            .state
            .projects
            .iter()
            .position(|project| project.id == *project_id)
        else {
            tracing::debug!(%project_id, "project not found; state unchanged");
            return false;
        };

        let mut project = Project::clone(&self.state.projects[idx]);
        if !mutator(&mut project) {
            return false;
        }

        let mut projects = Vec::clone(&self.state.projects);
        projects[idx] = Arc::new(project);
        self.commit(Arc::new(projects), self.state.current_project_id);
        true
    }

    fn commit(&mut self, projects: Arc<Vec<Arc<Project>>>, current_project_id: Option<ProjectId>) {
        self.state = TripSnapshot {
            projects,
            current_project_id,
            version: self.state.version + 1,
        };
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }
}
