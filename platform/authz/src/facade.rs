use crate::{Action, Actor, AuthzError, EmployeeId, Role, engine};

pub const UNAUTHENTICATED_MESSAGE: &str = "Please log in to continue.";
pub const FALLBACK_MESSAGE: &str = "Permission information not available.";

/// Binds the current actor (if any) into the policy predicates.
///
/// Built per request from the resolved session. Holds nothing but the actor.
#[derive(Clone, Debug, Default)]
pub struct AccessControl {
    actor: Option<Actor>,
}

impl AccessControl {
    pub fn new(actor: Option<Actor>) -> Self {
        Self { actor }
    }

    pub fn for_actor(actor: Actor) -> Self {
        Self::new(Some(actor))
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.actor.is_some()
    }

    /// Decide `action` for the bound actor. Always `false` when unauthenticated.
    pub fn check(&self, action: Action, target: Option<&EmployeeId>) -> bool {
        let Some(actor) = &self.actor else {
            return false;
        };
        engine::evaluate(action, actor.role, &actor.employee_id, target)
    }

    /// String entry point; unknown action names are denied.
    pub fn check_named(&self, name: &str, target: Option<&EmployeeId>) -> bool {
        name.parse::<Action>()
            .map(|action| self.check(action, target))
            .unwrap_or(false)
    }

    /// Like [`check`](Self::check) but carries the advisory message on denial.
    pub fn require(&self, action: Action, target: Option<&EmployeeId>) -> Result<(), AuthzError> {
        if self.check(action, target) {
            Ok(())
        } else {
            Err(AuthzError::Denied {
                action,
                message: self.describe_denial(action).to_string(),
            })
        }
    }

    /// Advisory text for the actor's role; not derived from the verdict.
    pub fn describe_denial(&self, action: Action) -> &'static str {
        match &self.actor {
            None => UNAUTHENTICATED_MESSAGE,
            Some(actor) => role_message(action, actor.role).unwrap_or(FALLBACK_MESSAGE),
        }
    }

    pub fn describe_denial_named(&self, name: &str) -> &'static str {
        if self.actor.is_none() {
            return UNAUTHENTICATED_MESSAGE;
        }
        name.parse::<Action>()
            .map(|action| self.describe_denial(action))
            .unwrap_or(FALLBACK_MESSAGE)
    }

    /// Every action granted for `target`, in [`Action::ALL`] order.
    pub fn permitted_actions(&self, target: Option<&EmployeeId>) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|action| self.check(*action, target))
            .collect()
    }

    pub fn can_view_profile(&self, target: &EmployeeId) -> bool {
        self.check(Action::ViewProfile, Some(target))
    }

    pub fn can_edit_profile(&self, target: &EmployeeId) -> bool {
        self.check(Action::EditProfile, Some(target))
    }

    pub fn can_view_sensitive_data(&self, target: &EmployeeId) -> bool {
        self.check(Action::ViewSensitiveData, Some(target))
    }

    pub fn can_view_team(&self) -> bool {
        self.check(Action::ViewTeam, None)
    }

    pub fn can_leave_feedback(&self, target: &EmployeeId) -> bool {
        self.check(Action::LeaveFeedback, Some(target))
    }

    pub fn can_view_feedback(&self, target: &EmployeeId) -> bool {
        self.check(Action::ViewFeedback, Some(target))
    }

    pub fn can_request_absence(&self) -> bool {
        self.check(Action::RequestAbsence, None)
    }

    pub fn can_view_absence_requests(&self, target: &EmployeeId) -> bool {
        self.check(Action::ViewAbsenceRequests, Some(target))
    }

    pub fn can_approve_absence(&self) -> bool {
        self.check(Action::ApproveAbsence, None)
    }
}

fn role_message(action: Action, role: Role) -> Option<&'static str> {
    let message = match (action, role) {
        (Action::ViewProfile, Role::Manager) => "As a manager, you can view all employee profiles.",
        (Action::ViewProfile, Role::Employee) => {
            "You can view your own profile and public information of co-workers."
        }
        (Action::ViewProfile, Role::Coworker) => "You can view public information of all employees.",
        (Action::EditProfile, Role::Manager) => "As a manager, you can edit all employee profiles.",
        (Action::EditProfile, Role::Employee) => "You can edit your own profile information.",
        (Action::EditProfile, Role::Coworker) => {
            "You cannot edit employee profiles. Contact a manager for changes."
        }
        (Action::ViewTeam, Role::Manager) => "As a manager, you have access to team overview.",
        (Action::ViewTeam, Role::Employee | Role::Coworker) => {
            "Team overview is only available to managers."
        }
        (Action::LeaveFeedback, Role::Manager) => {
            "As a manager, you can leave feedback for all employees."
        }
        (Action::LeaveFeedback, Role::Employee) => "You cannot leave feedback for yourself.",
        (Action::LeaveFeedback, Role::Coworker) => "You can leave feedback for other employees.",
        _ => return None,
    };
    Some(message)
}
