//! Authorization primitives for the HR suite.
//!
//! The [`engine`] module holds one pure predicate per governed [`Action`];
//! [`AccessControl`] binds the current [`Actor`] into those predicates and
//! supplies advisory denial messages for the UI.

pub mod engine;
mod facade;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use facade::{AccessControl, FALLBACK_MESSAGE, UNAUTHENTICATED_MESSAGE};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("employee identifier must not be empty")]
    EmptyIdentifier,
    #[error("action {action} denied: {message}")]
    Denied { action: Action, message: String },
}

/// Coarse privilege class of an authenticated user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Employee,
    Coworker,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Manager, Role::Employee, Role::Coworker];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Employee => "employee",
            Role::Coworker => "coworker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "manager" => Ok(Role::Manager),
            "employee" => Ok(Role::Employee),
            "coworker" => Ok(Role::Coworker),
            other => Err(AuthzError::UnknownRole(other.to_string())),
        }
    }
}

/// Opaque identifier of an employee record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Wraps the identifier as given. Predicates compare raw values, so prefer
    /// [`EmployeeId::parse`] for untrusted input.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Trims the input and rejects blank identifiers.
    pub fn parse(value: &str) -> Result<Self, AuthzError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AuthzError::EmptyIdentifier);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmployeeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The authenticated user a decision is made for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
    pub employee_id: EmployeeId,
    /// Human-readable name for attribution. Never consulted by the policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role, employee_id: impl Into<EmployeeId>) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            employee_id: employee_id.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Governed capabilities. Each maps to exactly one predicate in [`engine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "canViewProfile")]
    ViewProfile,
    #[serde(rename = "canEditProfile")]
    EditProfile,
    #[serde(rename = "canViewSensitiveData")]
    ViewSensitiveData,
    #[serde(rename = "canViewTeam")]
    ViewTeam,
    #[serde(rename = "canLeaveFeedback")]
    LeaveFeedback,
    #[serde(rename = "canViewFeedback")]
    ViewFeedback,
    #[serde(rename = "canRequestAbsence")]
    RequestAbsence,
    #[serde(rename = "canViewAbsenceRequests")]
    ViewAbsenceRequests,
    #[serde(rename = "canApproveAbsence")]
    ApproveAbsence,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::ViewProfile,
        Action::EditProfile,
        Action::ViewSensitiveData,
        Action::ViewTeam,
        Action::LeaveFeedback,
        Action::ViewFeedback,
        Action::RequestAbsence,
        Action::ViewAbsenceRequests,
        Action::ApproveAbsence,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::ViewProfile => "canViewProfile",
            Action::EditProfile => "canEditProfile",
            Action::ViewSensitiveData => "canViewSensitiveData",
            Action::ViewTeam => "canViewTeam",
            Action::LeaveFeedback => "canLeaveFeedback",
            Action::ViewFeedback => "canViewFeedback",
            Action::RequestAbsence => "canRequestAbsence",
            Action::ViewAbsenceRequests => "canViewAbsenceRequests",
            Action::ApproveAbsence => "canApproveAbsence",
        }
    }

    /// Whether the decision depends on a target employee.
    pub fn requires_target(self) -> bool {
        !matches!(
            self,
            Action::ViewTeam | Action::RequestAbsence | Action::ApproveAbsence
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| AuthzError::UnknownAction(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_round_trip_through_from_str() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
        assert_eq!(
            "canFly".parse::<Action>(),
            Err(AuthzError::UnknownAction("canFly".into()))
        );
    }

    #[test]
    fn action_serializes_to_wire_name() {
        let json = serde_json::to_string(&Action::ViewSensitiveData).unwrap();
        assert_eq!(json, "\"canViewSensitiveData\"");
    }

    #[test]
    fn role_is_lowercase_on_the_wire() {
        assert_eq!(serde_json::to_string(&Role::Coworker).unwrap(), "\"coworker\"");
        assert_eq!("manager".parse::<Role>(), Ok(Role::Manager));
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn employee_id_parse_rejects_blank_input() {
        assert_eq!(EmployeeId::parse("   "), Err(AuthzError::EmptyIdentifier));
        assert_eq!(EmployeeId::parse(" 7 ").unwrap().as_str(), "7");
    }

    #[test]
    fn only_team_and_absence_actions_are_target_free() {
        let target_free: Vec<Action> = Action::ALL
            .into_iter()
            .filter(|action| !action.requires_target())
            .collect();
        assert_eq!(
            target_free,
            vec![Action::ViewTeam, Action::RequestAbsence, Action::ApproveAbsence]
        );
    }
}
