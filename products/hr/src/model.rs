use chrono::{DateTime, NaiveDate, Utc};
use platform_authz::EmployeeId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub manager: String,
    pub start_date: NaiveDate,
    pub salary: u32,
    pub phone: String,
    pub address: String,
    pub emergency_contact: EmergencyContact,
    pub avatar: Option<String>,
}

/// Fields only the employee themself and managers may see.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SensitiveDetails {
    pub salary: u32,
    pub address: String,
    pub emergency_contact: EmergencyContact,
}

/// An employee record as visible to a particular actor.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct EmployeeView {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub position: String,
    pub department: String,
    pub manager: String,
    pub start_date: NaiveDate,
    pub phone: String,
    pub avatar: Option<String>,
    pub sensitive: Option<SensitiveDetails>,
}

impl EmployeeView {
    pub fn redacted(employee: &Employee) -> Self {
        Self {
            id: employee.id.clone(),
            name: employee.name.clone(),
            email: employee.email.clone(),
            position: employee.position.clone(),
            department: employee.department.clone(),
            manager: employee.manager.clone(),
            start_date: employee.start_date,
            phone: employee.phone.clone(),
            avatar: employee.avatar.clone(),
            sensitive: None,
        }
    }

    pub fn full(employee: &Employee) -> Self {
        Self {
            sensitive: Some(SensitiveDetails {
                salary: employee.salary,
                address: employee.address.clone(),
                emergency_contact: employee.emergency_contact.clone(),
            }),
            ..Self::redacted(employee)
        }
    }
}

/// Partial profile edit; `None` leaves the field untouched.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub manager: Option<String>,
    pub phone: Option<String>,
    pub salary: Option<u32>,
    pub address: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
}

impl ProfileUpdate {
    pub fn touches_sensitive(&self) -> bool {
        self.salary.is_some() || self.address.is_some() || self.emergency_contact.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply(self, employee: &mut Employee) {
        if let Some(email) = self.email {
            employee.email = email;
        }
        if let Some(position) = self.position {
            employee.position = position;
        }
        if let Some(department) = self.department {
            employee.department = department;
        }
        if let Some(manager) = self.manager {
            employee.manager = manager;
        }
        if let Some(phone) = self.phone {
            employee.phone = phone;
        }
        if let Some(salary) = self.salary {
            employee.salary = salary;
        }
        if let Some(address) = self.address {
            employee.address = address;
        }
        if let Some(contact) = self.emergency_contact {
            employee.emergency_contact = contact;
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Feedback {
    pub id: String,
    pub employee_id: EmployeeId,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub is_polished: bool,
    pub original_content: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewFeedback {
    pub employee_id: EmployeeId,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub is_polished: bool,
    pub original_content: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AbsenceKind {
    Vacation,
    Sick,
    Personal,
    Other,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AbsenceStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AbsenceRequest {
    pub id: String,
    pub employee_id: EmployeeId,
    pub kind: AbsenceKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: AbsenceStatus,
    pub created_at: DateTime<Utc>,
}

impl AbsenceRequest {
    /// Inclusive day count.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Request counts per status.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AbsenceStats {
    pub total: u32,
    pub pending: u32,
    pub approved: u32,
    pub rejected: u32,
}

impl AbsenceStats {
    pub fn tally<'a>(requests: impl IntoIterator<Item = &'a AbsenceRequest>) -> Self {
        requests.into_iter().fold(Self::default(), |mut stats, request| {
            stats.total += 1;
            match request.status {
                AbsenceStatus::Pending => stats.pending += 1,
                AbsenceStatus::Approved => stats.approved += 1,
                AbsenceStatus::Rejected => stats.rejected += 1,
            }
            stats
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAbsenceRequest {
    pub employee_id: EmployeeId,
    pub kind: AbsenceKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}
