//! Authenticated session context.
//!
//! A [`Session`] is created after a user is authenticated and handed
//! explicitly to whatever needs to know who is acting. Nothing in the engine
//! keeps a global "current user".

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Role of a user.
///
/// Roles are ordered: `Viewer < Editor < Owner`. A session satisfies a
/// requirement when its role is at least the required one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Read-only: lists and reports.
    Viewer,
    /// Can record clients, projects and revenue lines.
    Editor,
    /// Full access.
    Owner,
}

impl Role {
    /// Returns the canonical role string stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Owner => "owner",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "viewer" => Ok(Self::Viewer),
            "editor" => Ok(Self::Editor),
            "owner" => Ok(Self::Owner),
            other => Err(EngineError::InvalidRole(format!("unknown role: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    username: String,
    role: Role,
    active: bool,
}

impl Session {
    /// Starts a session for an already authenticated user.
    pub fn start(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
            active: true,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Invalidates the session (sign-out). Every later [`Session::require`]
    /// fails.
    pub fn end(&mut self) {
        self.active = false;
    }

    /// Checks that the session is active and holds at least `role`.
    pub fn require(&self, role: Role) -> ResultEngine<()> {
        if !self.active {
            return Err(EngineError::Forbidden("session ended".to_string()));
        }
        if self.role < role {
            return Err(EngineError::Forbidden(format!(
                "{} role required",
                role.as_str()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_ordered() {
        let editor = Session::start("mario", Role::Editor);
        assert!(editor.require(Role::Viewer).is_ok());
        assert!(editor.require(Role::Editor).is_ok());
        assert_eq!(
            editor.require(Role::Owner),
            Err(EngineError::Forbidden("owner role required".to_string()))
        );
    }

    #[test]
    fn ended_session_is_rejected() {
        let mut session = Session::start("mario", Role::Owner);
        session.end();
        assert!(!session.is_active());
        assert_eq!(
            session.require(Role::Viewer),
            Err(EngineError::Forbidden("session ended".to_string()))
        );
    }

    #[test]
    fn role_parsing() {
        assert_eq!(Role::try_from("editor").unwrap(), Role::Editor);
        assert!(Role::try_from("admin").is_err());
    }
}
