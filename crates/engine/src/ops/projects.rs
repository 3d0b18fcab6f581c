use sea_orm::{QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Project, ResultEngine, projects,
    util::{normalize_optional_text, normalize_required_text},
};

use super::Engine;

impl Engine {
    /// Opens a new project and returns its id.
    ///
    /// `project_number` must be unique across projects.
    pub async fn new_project(
        &self,
        project_number: &str,
        project_name: &str,
        client_name: Option<&str>,
    ) -> ResultEngine<Uuid> {
        let project = Project::new(
            normalize_required_text(project_number, "project number")?,
            normalize_required_text(project_name, "project name")?,
            normalize_optional_text(client_name),
        );

        let existing = projects::Entity::find()
            .filter(projects::Column::ProjectNumber.eq(project.project_number.as_str()))
            .one(&self.database)
            .await?;
        if existing.is_some() {
            return Err(EngineError::ExistingKey(project.project_number));
        }

        projects::ActiveModel::from(&project)
            .insert(&self.database)
            .await?;
        tracing::debug!(project_id = %project.id, "project created");
        Ok(project.id)
    }

    /// Lists every project ordered by project number.
    pub async fn list_projects(&self) -> ResultEngine<Vec<Project>> {
        projects::Entity::find()
            .order_by_asc(projects::Column::ProjectNumber)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Project::try_from)
            .collect()
    }
}
