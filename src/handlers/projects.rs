use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use super::common::{created_response, message_response, success_response};
use crate::{
    errors::ServiceError,
    models::project::{NewProject, ProjectPatch},
    AppState,
};

/// List projects
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    responses(
        (status = 200, description = "Projects retrieved", body = [crate::models::project::Project]),
    ),
    tag = "projects"
)]
pub async fn list_projects(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let projects = state.services.projects.list_projects().await?;
    Ok(success_response(projects))
}

/// Create project
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    request_body = NewProject,
    responses(
        (status = 201, description = "Project created", body = crate::models::project::Project),
        (status = 400, description = "Invalid project", body = crate::errors::ErrorResponse),
    ),
    tag = "projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<NewProject>,
) -> Result<impl IntoResponse, ServiceError> {
    let project = state.services.projects.create_project(payload).await?;
    Ok(created_response(project))
}

/// Get project
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project retrieved", body = crate::models::project::Project),
        (status = 404, description = "Project not found", body = crate::errors::ErrorResponse),
    ),
    tag = "projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let project = state.services.projects.get_project(&id).await?;
    Ok(success_response(project))
}

/// Update project
#[utoipa::path(
    put,
    path = "/api/v1/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    request_body = ProjectPatch,
    responses(
        (status = 200, description = "Project updated", body = crate::models::project::Project),
        (status = 400, description = "Invalid update", body = crate::errors::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::errors::ErrorResponse),
    ),
    tag = "projects"
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProjectPatch>,
) -> Result<impl IntoResponse, ServiceError> {
    let project = state.services.projects.update_project(&id, patch).await?;
    Ok(success_response(project))
}

/// Delete project
#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted", body = super::common::MessageResponse),
        (status = 404, description = "Project not found", body = crate::errors::ErrorResponse),
    ),
    tag = "projects"
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.projects.delete_project(&id).await?;
    Ok(message_response("Project deleted successfully"))
}
