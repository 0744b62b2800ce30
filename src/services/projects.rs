use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::project::{NewProject, Project, ProjectPatch},
    repositories::ProjectRepository,
};

use super::generate_id;

pub const PROJECT_ID_PREFIX: &str = "PRJ";

/// Service for the projects that group production orders
#[derive(Clone)]
pub struct ProjectService {
    repository: Arc<dyn ProjectRepository>,
    event_sender: Arc<EventSender>,
}

impl ProjectService {
    pub fn new(repository: Arc<dyn ProjectRepository>, event_sender: Arc<EventSender>) -> Self {
        Self {
            repository,
            event_sender,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_project(&self, input: NewProject) -> Result<Project, ServiceError> {
        input.validate()?;

        let project = Project::new(generate_id(PROJECT_ID_PREFIX), input, Utc::now());
        self.repository.insert(&project).await?;

        info!(project_id = %project.project_id, "Project created");
        self.event_sender
            .send_or_log(Event::ProjectCreated(project.project_id.clone()))
            .await;
        Ok(project)
    }

    #[instrument(skip(self))]
    pub async fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        self.repository.list().await
    }

    #[instrument(skip(self), fields(project_id = %project_id))]
    pub async fn get_project(&self, project_id: &str) -> Result<Project, ServiceError> {
        self.repository
            .find(project_id)
            .await?
            .ok_or_else(ServiceError::project_not_found)
    }

    #[instrument(skip(self, patch), fields(project_id = %project_id))]
    pub async fn update_project(
        &self,
        project_id: &str,
        patch: ProjectPatch,
    ) -> Result<Project, ServiceError> {
        patch.validate()?;

        let mut project = self.get_project(project_id).await?;
        project.apply_patch(patch, Utc::now());

        if !self.repository.save(&project).await? {
            return Err(ServiceError::project_not_found());
        }

        self.event_sender
            .send_or_log(Event::ProjectUpdated(project.project_id.clone()))
            .await;
        Ok(project)
    }

    /// Deletes the project. Orders referencing it keep their `project_id`.
    #[instrument(skip(self), fields(project_id = %project_id))]
    pub async fn delete_project(&self, project_id: &str) -> Result<(), ServiceError> {
        if !self.repository.delete(project_id).await? {
            return Err(ServiceError::project_not_found());
        }

        info!("Project deleted");
        self.event_sender
            .send_or_log(Event::ProjectDeleted(project_id.to_string()))
            .await;
        Ok(())
    }
}
