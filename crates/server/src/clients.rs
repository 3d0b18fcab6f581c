//! Clients API endpoints

use api_types::{
    Created,
    client::{ClientNew, ClientView},
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{Role, Session};

use crate::{ServerError, server::ServerState};

/// Handle requests for creating a new client
pub async fn client_new(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<ClientNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    session.require(Role::Editor)?;
    let id = state.engine.new_client(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// Handle requests for listing clients
pub async fn list(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<ClientView>>, ServerError> {
    session.require(Role::Viewer)?;
    let clients = state.engine.list_clients().await?;
    Ok(Json(
        clients
            .into_iter()
            .map(|client| ClientView {
                id: client.id,
                name: client.name,
            })
            .collect(),
    ))
}
