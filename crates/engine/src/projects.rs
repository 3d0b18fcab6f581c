//! The module contains `Project` struct and its table.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// A construction job revenue lines are booked against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    /// Human facing job number, e.g. `PR-104`. Unique.
    pub project_number: String,
    pub project_name: String,
    /// Client name copied onto the project when it was opened.
    ///
    /// Reports only use it when the revenue line itself does not point to a
    /// client that can be resolved.
    pub client_name: Option<String>,
}

impl Project {
    pub fn new(project_number: String, project_name: String, client_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_number,
            project_name,
            client_name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub project_number: String,
    pub project_name: String,
    pub client_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::revenues::Entity")]
    Revenues,
}

impl Related<super::revenues::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Revenues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Project> for ActiveModel {
    fn from(value: &Project) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            project_number: ActiveValue::Set(value.project_number.clone()),
            project_name: ActiveValue::Set(value.project_name.clone()),
            client_name: ActiveValue::Set(value.client_name.clone()),
        }
    }
}

impl TryFrom<Model> for Project {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "project")?,
            project_number: model.project_number,
            project_name: model.project_name,
            client_name: model.client_name,
        })
    }
}
