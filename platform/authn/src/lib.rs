//! Platform authentication helpers.
//!
//! Login is an email lookup against a fixed directory; a successful login
//! opens a server-side session whose id travels in a private cookie. No
//! passwords or tokens are verified here.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use platform_authz::{Actor, EmployeeId, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthnError {
    #[error("no user registered for {0}")]
    UnknownEmail(String),
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub employee_id: EmployeeId,
}

impl User {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role, self.employee_id.clone())
            .with_display_name(self.name.clone())
    }
}

#[derive(Clone, Debug, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// The three demo accounts, one per role.
    pub fn demo() -> Self {
        Self::new(vec![
            user("1", "Michael Chen", "michael.chen@newwork.com", Role::Manager, "2"),
            user("2", "Sarah Johnson", "sarah.johnson@newwork.com", Role::Employee, "1"),
            user("3", "Alex Rivera", "alex.rivera@newwork.com", Role::Coworker, "3"),
        ])
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    pub fn login(&self, email: &str) -> Result<&User, AuthnError> {
        let needle = email.trim();
        self.users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(needle))
            .ok_or_else(|| AuthnError::UnknownEmail(needle.to_string()))
    }
}

fn user(id: &str, name: &str, email: &str, role: Role, employee_id: &str) -> User {
    User {
        id: id.into(),
        name: name.into(),
        email: email.into(),
        role,
        employee_id: EmployeeId::new(employee_id),
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    pub id: Uuid,
    pub user: User,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Volatile session table shared by request handlers.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn create(&self, user: User) -> Session {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            user,
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions.write().insert(session.id, session.clone());
        tracing::debug!(session = %session.id, user = %session.user.id, "session opened");
        session
    }

    /// Live session for `id`; expired entries are dropped on lookup.
    pub fn resolve(&self, id: Uuid) -> Option<Session> {
        self.resolve_at(id, Utc::now())
    }

    fn resolve_at(&self, id: Uuid, now: DateTime<Utc>) -> Option<Session> {
        let mut sessions = self.sessions.write();
        match sessions.get(&id) {
            Some(session) if session.expires_at > now => Some(session.clone()),
            Some(_) => {
                sessions.remove(&id);
                tracing::debug!(session = %id, "session expired");
                None
            }
            None => None,
        }
    }

    pub fn revoke(&self, id: Uuid) -> bool {
        self.sessions.write().remove(&id).is_some()
    }
}
