//! Revenue report reconciliation.
//!
//! Revenue lines only carry project and client ids. A report needs the
//! project number/name and the client name next to each line, and the storage
//! layer is not assumed to offer a foreign-key aware join. The [`Reconciler`]
//! therefore rebuilds the denormalized rows itself:
//!
//! 1. list the facts (newest first),
//! 2. collect the distinct project ids and client ids they reference,
//! 3. resolve each id set with a single batched lookup (both concurrently),
//! 4. merge every fact with what was resolved, in input order,
//! 5. sum the amounts.
//!
//! A failed project lookup fails the whole report, since project number and
//! name are required columns. A failed client lookup only degrades client
//! names to the project's embedded name (or none).

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, MoneyCents, Project, ResolutionKind, ResultEngine, Revenue};

mod export;
mod row;
mod view;

pub use export::{ColumnKind, ExportColumn, revenue_report_columns};
pub use row::{ReportRow, UNASSIGNED};
pub use view::{Completion, Notice, ReportSnapshot, ReportView, Ticket};

/// Source of fact records.
#[async_trait]
pub trait FactSource: Send + Sync {
    /// Lists revenue lines ordered by date, newest first.
    async fn list_facts(&self) -> ResultEngine<Vec<Revenue>>;
}

/// Batched project resolution.
#[async_trait]
pub trait ProjectLookup: Send + Sync {
    /// Resolves every id in `ids` that exists. Unknown ids are simply absent
    /// from the returned map.
    async fn resolve_projects(&self, ids: &BTreeSet<Uuid>) -> ResultEngine<HashMap<Uuid, Project>>;
}

/// Batched client resolution, returning client names by id.
#[async_trait]
pub trait ClientLookup: Send + Sync {
    async fn resolve_clients(&self, ids: &BTreeSet<Uuid>) -> ResultEngine<HashMap<Uuid, String>>;
}

/// Denormalized rows plus their total.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub total: MoneyCents,
}

/// Builds [`Report`]s from a fact source and two lookup services.
#[derive(Clone, Copy)]
pub struct Reconciler<'a> {
    facts: &'a dyn FactSource,
    projects: &'a dyn ProjectLookup,
    clients: &'a dyn ClientLookup,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        facts: &'a dyn FactSource,
        projects: &'a dyn ProjectLookup,
        clients: &'a dyn ClientLookup,
    ) -> Self {
        Self {
            facts,
            projects,
            clients,
        }
    }

    /// Lists the facts and reconciles them.
    pub async fn load(&self) -> ResultEngine<Report> {
        let facts = self.facts.list_facts().await?;
        self.reconcile(facts).await
    }

    /// Merges `facts` with their resolved projects and clients.
    ///
    /// The returned rows have the same length and order as `facts`.
    pub async fn reconcile(&self, facts: Vec<Revenue>) -> ResultEngine<Report> {
        let project_ids: BTreeSet<Uuid> = facts.iter().filter_map(|f| f.project_id).collect();
        let client_ids: BTreeSet<Uuid> = facts.iter().filter_map(|f| f.client_id).collect();

        let (projects, clients) = tokio::join!(
            self.resolve_projects(&project_ids),
            self.resolve_clients(&client_ids)
        );
        let projects = projects?;

        let mut total = MoneyCents::ZERO;
        let mut rows = Vec::with_capacity(facts.len());
        for fact in facts {
            let project = fact.project_id.and_then(|id| projects.get(&id));
            let client_name = fact
                .client_id
                .and_then(|id| clients.get(&id))
                .map(String::as_str);

            total = total.checked_add(fact.amount).ok_or_else(|| {
                EngineError::InvalidAmount("report total overflows".to_string())
            })?;
            rows.push(ReportRow::merge(fact, project, client_name));
        }

        Ok(Report { rows, total })
    }

    async fn resolve_projects(
        &self,
        ids: &BTreeSet<Uuid>,
    ) -> ResultEngine<HashMap<Uuid, Project>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        self.projects
            .resolve_projects(ids)
            .await
            .map_err(|err| match err {
                EngineError::Resolution(_, message) => {
                    EngineError::Resolution(ResolutionKind::Project, message)
                }
                other => EngineError::Resolution(ResolutionKind::Project, other.to_string()),
            })
    }

    async fn resolve_clients(&self, ids: &BTreeSet<Uuid>) -> HashMap<Uuid, String> {
        if ids.is_empty() {
            return HashMap::new();
        }
        match self.clients.resolve_clients(ids).await {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(
                    requested = ids.len(),
                    "client lookup failed, falling back to project client names: {err}"
                );
                HashMap::new()
            }
        }
    }
}
