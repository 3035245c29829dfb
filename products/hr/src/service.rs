use std::sync::Arc;

use chrono::NaiveDate;
use platform_authz::{AccessControl, Action, Actor, AuthzError, EmployeeId};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    model::{
        AbsenceKind, AbsenceRequest, AbsenceStats, AbsenceStatus, Employee, EmployeeView, Feedback,
        NewAbsenceRequest, NewFeedback, ProfileUpdate,
    },
    polish::Polisher,
    store::{HrStore, StoreError},
};

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HrError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("{action} denied: {message}")]
    Forbidden { action: Action, message: String },
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Conflict(String),
}

impl From<StoreError> for HrError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::EmployeeNotFound(id) => HrError::NotFound(format!("employee {id}")),
            StoreError::AbsenceNotFound(id) => HrError::NotFound(format!("absence request {id}")),
            StoreError::InvalidDecision => HrError::Invalid(err.to_string()),
            StoreError::AlreadyDecided { .. } => HrError::Conflict(err.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub content: String,
    /// Run the draft through the polisher before storing it.
    pub polish: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbsenceDraft {
    pub kind: AbsenceKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbsenceDecision {
    Approve,
    Reject,
}

impl From<AbsenceDecision> for AbsenceStatus {
    fn from(decision: AbsenceDecision) -> Self {
        match decision {
            AbsenceDecision::Approve => AbsenceStatus::Approved,
            AbsenceDecision::Reject => AbsenceStatus::Rejected,
        }
    }
}

/// Policy-gated operations over the HR store.
#[derive(Clone)]
pub struct HrService {
    store: Arc<HrStore>,
    polisher: Arc<dyn Polisher>,
}

impl HrService {
    pub fn new(store: Arc<HrStore>, polisher: Arc<dyn Polisher>) -> Self {
        Self { store, polisher }
    }

    pub fn store(&self) -> &Arc<HrStore> {
        &self.store
    }

    pub fn profile(&self, access: &AccessControl, id: &EmployeeId) -> HrResult<EmployeeView> {
        authorize(access, Action::ViewProfile, Some(id))?;
        let employee = self.employee(id)?;
        Ok(view_for(access, &employee))
    }

    pub fn team(&self, access: &AccessControl) -> HrResult<Vec<EmployeeView>> {
        authorize(access, Action::ViewTeam, None)?;
        Ok(self
            .store
            .employees()
            .iter()
            .map(|employee| view_for(access, employee))
            .collect())
    }

    pub fn update_profile(
        &self,
        access: &AccessControl,
        id: &EmployeeId,
        mut update: ProfileUpdate,
    ) -> HrResult<EmployeeView> {
        let actor = authorize(access, Action::EditProfile, Some(id))?;
        if update.touches_sensitive() {
            authorize(access, Action::ViewSensitiveData, Some(id))?;
        }
        if update.is_empty() {
            return Err(HrError::Invalid("no profile fields to update".into()));
        }
        if let Some(email) = update.email.take() {
            update.email = Some(non_blank(&email, "email")?.to_string());
        }
        let employee = self.store.update_employee(id, update)?;
        info!(employee = %id, actor = %actor.user_id, "profile updated");
        Ok(view_for(access, &employee))
    }

    pub fn feedback_for(&self, access: &AccessControl, id: &EmployeeId) -> HrResult<Vec<Feedback>> {
        authorize(access, Action::ViewFeedback, Some(id))?;
        Ok(self.store.feedback_for(id))
    }

    /// Preview of what [`leave_feedback`](Self::leave_feedback) would store
    /// with `polish` set.
    pub fn polish_preview(&self, access: &AccessControl, text: &str) -> HrResult<String> {
        if !access.is_authenticated() {
            return Err(HrError::Unauthenticated);
        }
        let text = non_blank(text, "feedback")?;
        Ok(self.polisher.polish(text))
    }

    pub fn leave_feedback(
        &self,
        access: &AccessControl,
        target: &EmployeeId,
        draft: FeedbackDraft,
    ) -> HrResult<Feedback> {
        let actor = authorize(access, Action::LeaveFeedback, Some(target))?;
        self.employee(target)?;
        let original = non_blank(&draft.content, "feedback")?.to_string();
        let author_name = match &actor.display_name {
            Some(name) => name.clone(),
            None => self
                .store
                .employee(&actor.employee_id)
                .map(|employee| employee.name)
                .unwrap_or_else(|| actor.user_id.clone()),
        };

        let new = if draft.polish {
            NewFeedback {
                employee_id: target.clone(),
                author_id: actor.user_id.clone(),
                author_name,
                content: self.polisher.polish(&original),
                is_polished: true,
                original_content: Some(original),
            }
        } else {
            NewFeedback {
                employee_id: target.clone(),
                author_id: actor.user_id.clone(),
                author_name,
                content: original,
                is_polished: false,
                original_content: None,
            }
        };
        let feedback = self.store.add_feedback(new);
        info!(
            feedback = %feedback.id,
            employee = %target,
            polished = feedback.is_polished,
            "feedback recorded"
        );
        Ok(feedback)
    }

    pub fn absence_requests_for(
        &self,
        access: &AccessControl,
        id: &EmployeeId,
    ) -> HrResult<Vec<AbsenceRequest>> {
        authorize(access, Action::ViewAbsenceRequests, Some(id))?;
        Ok(self.store.absence_requests_for(id))
    }

    pub fn pending_absence_requests(&self, access: &AccessControl) -> HrResult<Vec<AbsenceRequest>> {
        authorize(access, Action::ApproveAbsence, None)?;
        Ok(self
            .store
            .absence_requests()
            .into_iter()
            .filter(|request| request.status == AbsenceStatus::Pending)
            .collect())
    }

    /// Every request in every status, newest first.
    pub fn all_absence_requests(&self, access: &AccessControl) -> HrResult<Vec<AbsenceRequest>> {
        authorize(access, Action::ApproveAbsence, None)?;
        Ok(self.store.absence_requests())
    }

    pub fn absence_stats_for(&self, access: &AccessControl, id: &EmployeeId) -> HrResult<AbsenceStats> {
        authorize(access, Action::ViewAbsenceRequests, Some(id))?;
        Ok(AbsenceStats::tally(&self.store.absence_requests_for(id)))
    }

    pub fn team_absence_stats(&self, access: &AccessControl) -> HrResult<AbsenceStats> {
        authorize(access, Action::ApproveAbsence, None)?;
        Ok(AbsenceStats::tally(&self.store.absence_requests()))
    }

    /// File a request for the actor's own employee record.
    pub fn request_absence(
        &self,
        access: &AccessControl,
        draft: AbsenceDraft,
        today: NaiveDate,
    ) -> HrResult<AbsenceRequest> {
        let actor = authorize(access, Action::RequestAbsence, None)?;
        if draft.start_date < today {
            return Err(HrError::Invalid("Start date cannot be in the past".into()));
        }
        if draft.end_date < draft.start_date {
            return Err(HrError::Invalid(
                "End date cannot be before start date".into(),
            ));
        }
        let reason = non_blank(&draft.reason, "reason")?.to_string();
        let request = self.store.add_absence_request(NewAbsenceRequest {
            employee_id: actor.employee_id.clone(),
            kind: draft.kind,
            start_date: draft.start_date,
            end_date: draft.end_date,
            reason,
        });
        info!(request = %request.id, employee = %request.employee_id, days = request.days(), "absence requested");
        Ok(request)
    }

    pub fn decide_absence(
        &self,
        access: &AccessControl,
        request_id: &str,
        decision: AbsenceDecision,
    ) -> HrResult<AbsenceRequest> {
        let actor = authorize(access, Action::ApproveAbsence, None)?;
        let request = self.store.decide_absence(request_id, decision.into())?;
        info!(request = %request.id, status = ?request.status, actor = %actor.user_id, "absence decided");
        Ok(request)
    }

    fn employee(&self, id: &EmployeeId) -> HrResult<Employee> {
        self.store
            .employee(id)
            .ok_or_else(|| HrError::NotFound(format!("employee {id}")))
    }
}

fn authorize<'a>(
    access: &'a AccessControl,
    action: Action,
    target: Option<&EmployeeId>,
) -> HrResult<&'a Actor> {
    let Some(actor) = access.actor() else {
        warn!(%action, "unauthenticated request");
        return Err(HrError::Unauthenticated);
    };
    access.require(action, target).map_err(|err| {
        warn!(%action, actor = %actor.user_id, role = %actor.role, target = ?target.map(EmployeeId::as_str), "access denied");
        match err {
            AuthzError::Denied { action, message } => HrError::Forbidden { action, message },
            other => HrError::Invalid(other.to_string()),
        }
    })?;
    Ok(actor)
}

fn view_for(access: &AccessControl, employee: &Employee) -> EmployeeView {
    if access.can_view_sensitive_data(&employee.id) {
        EmployeeView::full(employee)
    } else {
        EmployeeView::redacted(employee)
    }
}

fn non_blank<'a>(value: &'a str, field: &str) -> HrResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(HrError::Invalid(format!("{field} must not be empty")))
    } else {
        Ok(trimmed)
    }
}
