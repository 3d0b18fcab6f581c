//! The engine as fact source and lookup service for revenue reports.
//!
//! Each lookup is a single `IN (...)` query over one id set. No joins.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Client, Project, ResultEngine, Revenue, clients, projects,
    report::{ClientLookup, FactSource, ProjectLookup, Reconciler, Report},
    revenues,
};

use super::Engine;

fn id_strings(ids: &BTreeSet<Uuid>) -> Vec<String> {
    ids.iter().map(Uuid::to_string).collect()
}

#[async_trait]
impl FactSource for Engine {
    async fn list_facts(&self) -> ResultEngine<Vec<Revenue>> {
        revenues::Entity::find()
            .order_by_desc(revenues::Column::Date)
            .order_by_desc(revenues::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Revenue::try_from)
            .collect()
    }
}

#[async_trait]
impl ProjectLookup for Engine {
    async fn resolve_projects(&self, ids: &BTreeSet<Uuid>) -> ResultEngine<HashMap<Uuid, Project>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        projects::Entity::find()
            .filter(projects::Column::Id.is_in(id_strings(ids)))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| Project::try_from(model).map(|project| (project.id, project)))
            .collect()
    }
}

#[async_trait]
impl ClientLookup for Engine {
    async fn resolve_clients(&self, ids: &BTreeSet<Uuid>) -> ResultEngine<HashMap<Uuid, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        clients::Entity::find()
            .filter(clients::Column::Id.is_in(id_strings(ids)))
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| Client::try_from(model).map(|client| (client.id, client.name)))
            .collect()
    }
}

impl Engine {
    /// Reconciler backed by this engine for facts, projects and clients.
    pub fn revenue_reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(self, self, self)
    }

    /// Loads the revenue line items report.
    pub async fn revenue_report(&self) -> ResultEngine<Report> {
        self.revenue_reconciler().load().await
    }
}
