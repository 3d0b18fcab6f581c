use sea_orm::{ActiveValue, prelude::*};

use crate::{
    EngineError, ResultEngine, Role, Session, users, util::normalize_required_text,
};

use super::Engine;

impl Engine {
    /// Creates a user with the given role.
    pub async fn new_user(&self, username: &str, password: &str, role: Role) -> ResultEngine<()> {
        let username = normalize_required_text(username, "username")?;
        if password.is_empty() {
            return Err(EngineError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }

        if users::Entity::find_by_id(username.clone())
            .one(&self.database)
            .await?
            .is_some()
        {
            return Err(EngineError::ExistingKey(username));
        }

        users::ActiveModel {
            username: ActiveValue::Set(username),
            password: ActiveValue::Set(password.to_string()),
            role: ActiveValue::Set(role.as_str().to_string()),
        }
        .insert(&self.database)
        .await?;
        Ok(())
    }

    /// Checks credentials and starts a [`Session`].
    ///
    /// Returns `None` when the user does not exist or the password is wrong.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<Option<Session>> {
        if username.is_empty() || password.is_empty() {
            return Ok(None);
        }

        let Some(user) = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };
        if user.password != password {
            return Ok(None);
        }

        let role = Role::try_from(user.role.as_str())?;
        Ok(Some(Session::start(user.username, role)))
    }
}
