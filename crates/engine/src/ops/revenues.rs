use sea_orm::{TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Revenue, RevenueNew, clients, projects, revenues};

use super::{Engine, with_tx};

impl Engine {
    /// Records a revenue line and returns its id.
    ///
    /// Referenced project and client must exist.
    pub async fn new_revenue(&self, input: RevenueNew) -> ResultEngine<Uuid> {
        let revenue = Revenue::new(input)?;

        with_tx!(self, |db_tx| {
            if let Some(project_id) = revenue.project_id
                && projects::Entity::find_by_id(project_id.to_string())
                    .one(&db_tx)
                    .await?
                    .is_none()
            {
                return Err(EngineError::KeyNotFound("project not exists".to_string()));
            }
            if let Some(client_id) = revenue.client_id
                && clients::Entity::find_by_id(client_id.to_string())
                    .one(&db_tx)
                    .await?
                    .is_none()
            {
                return Err(EngineError::KeyNotFound("client not exists".to_string()));
            }

            revenues::ActiveModel::from(&revenue).insert(&db_tx).await?;
            Ok(revenue.id)
        })
    }
}
