//! Registry of the projects currently open.

use indexmap::IndexMap;
use std::path::Path;
use tracing::{info, instrument};

use budget_types::ProjectId;

use crate::error::RepoError;
use crate::project::Project;
use crate::store::smallest_unused;

/// All open projects, keyed by a runtime identifier.
///
/// Projects are independent of each other. Removing one never saves it.
#[derive(Debug, Default)]
pub struct Projects {
    projects: IndexMap<ProjectId, Project>,
}

impl Projects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a project in `directory` and registers it.
    ///
    /// With `load_existing` the project is read from `project.json` first; a
    /// load failure leaves the registry unchanged.
    #[instrument(skip(self, directory), fields(directory = %directory.as_ref().display()))]
    pub fn create_new_project(
        &mut self,
        directory: impl AsRef<Path>,
        load_existing: bool,
    ) -> Result<&mut Project, RepoError> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(RepoError::NotADirectory(directory.to_path_buf()));
        }

        let id = smallest_unused(|id| self.projects.contains_key(&id));
        let project = if load_existing {
            Project::open(id, directory)?
        } else {
            Project::new(id, directory)
        };

        info!(project = %id, name = %project.folder_name(), "Opened project");
        let (index, _) = self.projects.insert_full(id, project);
        Ok(&mut self.projects[index])
    }

    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.projects.get(&id)
    }

    pub fn get_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.get_mut(&id)
    }

    /// Closes a project without saving it.
    pub fn pop(&mut self, id: ProjectId) -> Result<Project, RepoError> {
        let project = self
            .projects
            .shift_remove(&id)
            .ok_or(RepoError::ProjectNotFound(id))?;
        info!(project = %id, "Closed project");
        Ok(project)
    }

    pub fn keys(&self) -> impl Iterator<Item = ProjectId> + '_ {
        self.projects.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProjectId, &Project)> {
        self.projects.iter().map(|(id, project)| (*id, project))
    }

    pub fn n_projects(&self) -> usize {
        self.projects.len()
    }

    /// True when at least one project is open.
    pub fn has_open_projects(&self) -> bool {
        !self.projects.is_empty()
    }
}
