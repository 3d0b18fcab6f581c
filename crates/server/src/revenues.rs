//! Revenue lines API endpoints

use api_types::{Created, revenue::RevenueNew};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{MoneyCents, Role, Session};

use crate::{ServerError, server::ServerState};

/// Handle requests for recording a revenue line
pub async fn revenue_new(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
    Json(payload): Json<RevenueNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    session.require(Role::Editor)?;
    let id = state
        .engine
        .new_revenue(engine::RevenueNew {
            date: payload.date,
            invoice_number: payload.invoice_number,
            amount: MoneyCents::new(payload.amount_minor),
            description: payload.description,
            account_code: payload.account_code,
            account_name: payload.account_name,
            external_txn_id: payload.external_txn_id,
            project_id: payload.project_id,
            client_id: payload.client_id,
            is_split: payload.is_split,
        })
        .await?;
    tracing::info!(user = session.username(), revenue_id = %id, "revenue recorded");
    Ok((StatusCode::CREATED, Json(Created { id })))
}
