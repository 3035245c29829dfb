use async_graphql::{Enum, ID, InputObject, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use products_hr::{
    AbsenceDecision, AbsenceKind, AbsenceRequest, AbsenceStats, AbsenceStatus, EmergencyContact, EmployeeView,
    Feedback, ProfileUpdate, SensitiveDetails,
};

#[derive(Clone, Debug, SimpleObject)]
pub struct EmployeeNode {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub manager: String,
    pub start_date: NaiveDate,
    pub phone: String,
    pub avatar: Option<String>,
    /// Absent when the caller may not see salary, address or emergency contact.
    pub sensitive: Option<SensitiveNode>,
}

impl From<EmployeeView> for EmployeeNode {
    fn from(view: EmployeeView) -> Self {
        Self {
            id: ID(view.id.to_string()),
            name: view.name,
            email: view.email,
            position: view.position,
            department: view.department,
            manager: view.manager,
            start_date: view.start_date,
            phone: view.phone,
            avatar: view.avatar,
            sensitive: view.sensitive.map(SensitiveNode::from),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct SensitiveNode {
    pub salary: u32,
    pub address: String,
    pub emergency_contact: EmergencyContactNode,
}

impl From<SensitiveDetails> for SensitiveNode {
    fn from(details: SensitiveDetails) -> Self {
        Self {
            salary: details.salary,
            address: details.address,
            emergency_contact: details.emergency_contact.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject, InputObject)]
#[graphql(input_name = "EmergencyContactInput")]
pub struct EmergencyContactNode {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

impl From<EmergencyContact> for EmergencyContactNode {
    fn from(contact: EmergencyContact) -> Self {
        Self {
            name: contact.name,
            phone: contact.phone,
            relationship: contact.relationship,
        }
    }
}

impl From<EmergencyContactNode> for EmergencyContact {
    fn from(node: EmergencyContactNode) -> Self {
        Self {
            name: node.name,
            phone: node.phone,
            relationship: node.relationship,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct FeedbackNode {
    pub id: ID,
    pub employee_id: ID,
    pub author_id: ID,
    pub author_name: String,
    pub content: String,
    pub is_polished: bool,
    pub original_content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Feedback> for FeedbackNode {
    fn from(feedback: Feedback) -> Self {
        Self {
            id: ID(feedback.id),
            employee_id: ID(feedback.employee_id.to_string()),
            author_id: ID(feedback.author_id),
            author_name: feedback.author_name,
            content: feedback.content,
            is_polished: feedback.is_polished,
            original_content: feedback.original_content,
            created_at: feedback.created_at,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum AbsenceKindValue {
    #[graphql(name = "VACATION")]
    Vacation,
    #[graphql(name = "SICK")]
    Sick,
    #[graphql(name = "PERSONAL")]
    Personal,
    #[graphql(name = "OTHER")]
    Other,
}

impl From<AbsenceKind> for AbsenceKindValue {
    fn from(kind: AbsenceKind) -> Self {
        match kind {
            AbsenceKind::Vacation => Self::Vacation,
            AbsenceKind::Sick => Self::Sick,
            AbsenceKind::Personal => Self::Personal,
            AbsenceKind::Other => Self::Other,
        }
    }
}

impl From<AbsenceKindValue> for AbsenceKind {
    fn from(value: AbsenceKindValue) -> Self {
        match value {
            AbsenceKindValue::Vacation => Self::Vacation,
            AbsenceKindValue::Sick => Self::Sick,
            AbsenceKindValue::Personal => Self::Personal,
            AbsenceKindValue::Other => Self::Other,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum AbsenceStatusValue {
    #[graphql(name = "PENDING")]
    Pending,
    #[graphql(name = "APPROVED")]
    Approved,
    #[graphql(name = "REJECTED")]
    Rejected,
}

impl From<AbsenceStatus> for AbsenceStatusValue {
    fn from(status: AbsenceStatus) -> Self {
        match status {
            AbsenceStatus::Pending => Self::Pending,
            AbsenceStatus::Approved => Self::Approved,
            AbsenceStatus::Rejected => Self::Rejected,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum AbsenceDecisionValue {
    #[graphql(name = "APPROVE")]
    Approve,
    #[graphql(name = "REJECT")]
    Reject,
}

impl From<AbsenceDecisionValue> for AbsenceDecision {
    fn from(value: AbsenceDecisionValue) -> Self {
        match value {
            AbsenceDecisionValue::Approve => Self::Approve,
            AbsenceDecisionValue::Reject => Self::Reject,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct AbsenceRequestNode {
    pub id: ID,
    pub employee_id: ID,
    pub kind: AbsenceKindValue,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub reason: String,
    pub status: AbsenceStatusValue,
    pub created_at: DateTime<Utc>,
}

impl From<AbsenceRequest> for AbsenceRequestNode {
    fn from(request: AbsenceRequest) -> Self {
        Self {
            days: request.days(),
            id: ID(request.id),
            employee_id: ID(request.employee_id.to_string()),
            kind: request.kind.into(),
            start_date: request.start_date,
            end_date: request.end_date,
            reason: request.reason,
            status: request.status.into(),
            created_at: request.created_at,
        }
    }
}

#[derive(Clone, Copy, Debug, SimpleObject)]
pub struct AbsenceStatsNode {
    pub total: u32,
    pub pending: u32,
    pub approved: u32,
    pub rejected: u32,
}

impl From<AbsenceStats> for AbsenceStatsNode {
    fn from(stats: AbsenceStats) -> Self {
        Self {
            total: stats.total,
            pending: stats.pending,
            approved: stats.approved,
            rejected: stats.rejected,
        }
    }
}

#[derive(Clone, Debug, Default, InputObject)]
pub struct ProfileUpdateInput {
    pub email: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub manager: Option<String>,
    pub phone: Option<String>,
    pub salary: Option<u32>,
    pub address: Option<String>,
    pub emergency_contact: Option<EmergencyContactNode>,
}

impl From<ProfileUpdateInput> for ProfileUpdate {
    fn from(input: ProfileUpdateInput) -> Self {
        Self {
            email: input.email,
            position: input.position,
            department: input.department,
            manager: input.manager,
            phone: input.phone,
            salary: input.salary,
            address: input.address,
            emergency_contact: input.emergency_contact.map(Into::into),
        }
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct AbsenceRequestInput {
    pub kind: AbsenceKindValue,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}
