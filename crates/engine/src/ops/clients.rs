use sea_orm::{QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{Client, ResultEngine, clients, util::normalize_required_text};

use super::Engine;

impl Engine {
    /// Creates a new client and returns its id.
    pub async fn new_client(&self, name: &str) -> ResultEngine<Uuid> {
        let client = Client::new(normalize_required_text(name, "client name")?);
        clients::ActiveModel::from(&client)
            .insert(&self.database)
            .await?;
        tracing::debug!(client_id = %client.id, "client created");
        Ok(client.id)
    }

    /// Lists every client ordered by name.
    pub async fn list_clients(&self) -> ResultEngine<Vec<Client>> {
        clients::Entity::find()
            .order_by_asc(clients::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Client::try_from)
            .collect()
    }
}
