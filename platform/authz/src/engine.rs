//! Pure access predicates.
//!
//! Every predicate is total over [`Role`] and evaluates its clauses in a fixed
//! order: manager override, then self-match, then role class. The first clause
//! that matches decides. Nothing here logs, allocates state, or performs I/O.

use crate::{Action, EmployeeId, Role};

fn is_self(target: &EmployeeId, actor_employee: &EmployeeId) -> bool {
    target == actor_employee
}

pub fn can_view_profile(target: &EmployeeId, role: Role, actor_employee: &EmployeeId) -> bool {
    match role {
        Role::Manager => true,
        Role::Employee => is_self(target, actor_employee),
        // Profile itself is public to co-workers; sensitive fields are gated separately.
        Role::Coworker => true,
    }
}

pub fn can_edit_profile(target: &EmployeeId, role: Role, actor_employee: &EmployeeId) -> bool {
    match role {
        Role::Manager => true,
        Role::Employee => is_self(target, actor_employee),
        Role::Coworker => false,
    }
}

/// Salary, home address and emergency contact.
pub fn can_view_sensitive_data(
    target: &EmployeeId,
    role: Role,
    actor_employee: &EmployeeId,
) -> bool {
    match role {
        Role::Manager => true,
        Role::Employee => is_self(target, actor_employee),
        Role::Coworker => false,
    }
}

pub fn can_view_team(role: Role) -> bool {
    role == Role::Manager
}

/// Nobody reviews themselves, managers included.
pub fn can_leave_feedback(target: &EmployeeId, role: Role, actor_employee: &EmployeeId) -> bool {
    if is_self(target, actor_employee) {
        return false;
    }
    matches!(role, Role::Manager | Role::Coworker)
}

pub fn can_view_feedback(target: &EmployeeId, role: Role, actor_employee: &EmployeeId) -> bool {
    match role {
        Role::Manager => true,
        Role::Employee => is_self(target, actor_employee),
        // NOTE: unconditional for co-workers, wider than sensitive-data access.
        Role::Coworker => true,
    }
}

pub fn can_request_absence(_role: Role) -> bool {
    true
}

pub fn can_view_absence_requests(
    target: &EmployeeId,
    role: Role,
    actor_employee: &EmployeeId,
) -> bool {
    match role {
        Role::Manager => true,
        Role::Employee => is_self(target, actor_employee),
        Role::Coworker => false,
    }
}

pub fn can_approve_absence(role: Role) -> bool {
    role == Role::Manager
}

/// Dispatch `action` to its predicate.
///
/// Target-dependent actions are denied when `target` is `None`; target-free
/// actions ignore it.
pub fn evaluate(
    action: Action,
    role: Role,
    actor_employee: &EmployeeId,
    target: Option<&EmployeeId>,
) -> bool {
    let with_target = |predicate: fn(&EmployeeId, Role, &EmployeeId) -> bool| {
        target.is_some_and(|target| predicate(target, role, actor_employee))
    };
    match action {
        Action::ViewProfile => with_target(can_view_profile),
        Action::EditProfile => with_target(can_edit_profile),
        Action::ViewSensitiveData => with_target(can_view_sensitive_data),
        Action::ViewTeam => can_view_team(role),
        Action::LeaveFeedback => with_target(can_leave_feedback),
        Action::ViewFeedback => with_target(can_view_feedback),
        Action::RequestAbsence => can_request_absence(role),
        Action::ViewAbsenceRequests => with_target(can_view_absence_requests),
        Action::ApproveAbsence => can_approve_absence(role),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> EmployeeId {
        EmployeeId::new(value)
    }

    #[test]
    fn employee_on_own_record() {
        let me = id("1");
        assert!(can_edit_profile(&me, Role::Employee, &me));
        assert!(can_view_sensitive_data(&me, Role::Employee, &me));
        assert!(can_view_absence_requests(&me, Role::Employee, &me));
        assert!(!can_leave_feedback(&me, Role::Employee, &me));
    }

    #[test]
    fn employee_on_someone_else() {
        let me = id("1");
        let other = id("3");
        assert!(!can_view_profile(&other, Role::Employee, &me));
        assert!(!can_edit_profile(&other, Role::Employee, &me));
        assert!(!can_leave_feedback(&other, Role::Employee, &me));
        assert!(!can_view_feedback(&other, Role::Employee, &me));
    }

    #[test]
    fn coworker_sees_public_profile_but_no_sensitive_fields() {
        let me = id("3");
        let other = id("1");
        assert!(can_view_profile(&other, Role::Coworker, &me));
        assert!(can_leave_feedback(&other, Role::Coworker, &me));
        assert!(!can_edit_profile(&other, Role::Coworker, &me));
        assert!(!can_view_sensitive_data(&other, Role::Coworker, &me));
        assert!(!can_view_sensitive_data(&me, Role::Coworker, &me));
    }

    #[test]
    fn evaluate_denies_targeted_actions_without_target() {
        let me = id("2");
        assert!(!evaluate(Action::ViewProfile, Role::Manager, &me, None));
        assert!(evaluate(Action::ViewTeam, Role::Manager, &me, None));
        assert!(evaluate(Action::ApproveAbsence, Role::Manager, &me, Some(&id("1"))));
    }
}
