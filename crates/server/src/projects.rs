//! Projects API endpoints

use api_types::{
    Created,
    project::{ProjectNew, ProjectView},
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{Role, Session};

use crate::{ServerError, server::ServerState};

/// Handle requests for opening a new project
pub async fn project_new(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<ProjectNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    session.require(Role::Editor)?;
    let id = state
        .engine
        .new_project(
            &payload.project_number,
            &payload.project_name,
            payload.client_name.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// Handle requests for listing projects
pub async fn list(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<ProjectView>>, ServerError> {
    session.require(Role::Viewer)?;
    let projects = state.engine.list_projects().await?;
    Ok(Json(
        projects
            .into_iter()
            .map(|project| ProjectView {
                id: project.id,
                project_number: project.project_number,
                project_name: project.project_name,
                client_name: project.client_name,
            })
            .collect(),
    ))
}
