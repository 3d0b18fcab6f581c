//! Report API endpoints

use api_types::report::{ColumnKind, ColumnView, RevenueReport};
use axum::{Extension, Json, extract::State};
use engine::{Role, Session};

use crate::{ServerError, server::ServerState};

fn map_kind(kind: engine::ColumnKind) -> ColumnKind {
    match kind {
        engine::ColumnKind::Date => ColumnKind::Date,
        engine::ColumnKind::Text => ColumnKind::Text,
        engine::ColumnKind::Currency => ColumnKind::Currency,
    }
}

/// Handle requests for the revenue line items report
pub async fn revenue_report(
    Extension(session): Extension<Session>,
    State(state): State<ServerState>,
) -> Result<Json<RevenueReport>, ServerError> {
    session.require(Role::Viewer)?;

    let report = state.engine.revenue_report().await?;

    let columns = engine::revenue_report_columns()
        .iter()
        .map(|column| ColumnView {
            key: column.key.to_string(),
            label: column.label.to_string(),
            kind: map_kind(column.kind),
        })
        .collect();
    let rows = report.rows.iter().map(engine::ReportRow::to_record).collect();

    Ok(Json(RevenueReport {
        columns,
        rows,
        total_minor: report.total.cents(),
    }))
}
