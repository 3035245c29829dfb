use chrono::Utc;
use parking_lot::RwLock;
use platform_authz::EmployeeId;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    model::{
        AbsenceRequest, AbsenceStatus, Employee, Feedback, NewAbsenceRequest, NewFeedback,
        ProfileUpdate,
    },
    seed,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("employee {0} not found")]
    EmployeeNotFound(EmployeeId),
    #[error("absence request {0} not found")]
    AbsenceNotFound(String),
    #[error("absence request {id} already {status:?}")]
    AlreadyDecided { id: String, status: AbsenceStatus },
    #[error("absence requests can only be approved or rejected")]
    InvalidDecision,
}

#[derive(Debug, Default)]
struct Tables {
    employees: Vec<Employee>,
    feedback: Vec<Feedback>,
    absences: Vec<AbsenceRequest>,
}

/// In-memory HR records. Mutations take the write lock for their full
/// read-modify-write, so each record changes atomically.
#[derive(Debug, Default)]
pub struct HrStore {
    tables: RwLock<Tables>,
}

impl HrStore {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                employees,
                ..Tables::default()
            }),
        }
    }

    pub fn seeded() -> Self {
        Self {
            tables: RwLock::new(Tables {
                employees: seed::employees(),
                feedback: seed::feedback(),
                absences: seed::absence_requests(),
            }),
        }
    }

    pub fn employees(&self) -> Vec<Employee> {
        self.tables.read().employees.clone()
    }

    pub fn employee(&self, id: &EmployeeId) -> Option<Employee> {
        self.tables
            .read()
            .employees
            .iter()
            .find(|employee| &employee.id == id)
            .cloned()
    }

    pub fn update_employee(
        &self,
        id: &EmployeeId,
        update: ProfileUpdate,
    ) -> Result<Employee, StoreError> {
        let mut tables = self.tables.write();
        let employee = tables
            .employees
            .iter_mut()
            .find(|employee| &employee.id == id)
            .ok_or_else(|| StoreError::EmployeeNotFound(id.clone()))?;
        update.apply(employee);
        Ok(employee.clone())
    }

    /// Feedback about `id`, newest first.
    pub fn feedback_for(&self, id: &EmployeeId) -> Vec<Feedback> {
        self.tables
            .read()
            .feedback
            .iter()
            .filter(|entry| &entry.employee_id == id)
            .cloned()
            .collect()
    }

    pub fn add_feedback(&self, new: NewFeedback) -> Feedback {
        let feedback = Feedback {
            id: Uuid::new_v4().to_string(),
            employee_id: new.employee_id,
            author_id: new.author_id,
            author_name: new.author_name,
            content: new.content,
            is_polished: new.is_polished,
            original_content: new.original_content,
            created_at: Utc::now(),
        };
        self.tables.write().feedback.insert(0, feedback.clone());
        feedback
    }

    pub fn absence_requests(&self) -> Vec<AbsenceRequest> {
        self.tables.read().absences.clone()
    }

    pub fn absence_requests_for(&self, id: &EmployeeId) -> Vec<AbsenceRequest> {
        self.tables
            .read()
            .absences
            .iter()
            .filter(|request| &request.employee_id == id)
            .cloned()
            .collect()
    }

    pub fn add_absence_request(&self, new: NewAbsenceRequest) -> AbsenceRequest {
        let request = AbsenceRequest {
            id: Uuid::new_v4().to_string(),
            employee_id: new.employee_id,
            kind: new.kind,
            start_date: new.start_date,
            end_date: new.end_date,
            reason: new.reason,
            status: AbsenceStatus::Pending,
            created_at: Utc::now(),
        };
        self.tables.write().absences.insert(0, request.clone());
        request
    }

    /// Move a pending request to `status`. A request that has already been
    /// decided is left untouched and reported as a conflict.
    pub fn decide_absence(
        &self,
        id: &str,
        status: AbsenceStatus,
    ) -> Result<AbsenceRequest, StoreError> {
        if status == AbsenceStatus::Pending {
            return Err(StoreError::InvalidDecision);
        }
        let mut tables = self.tables.write();
        let request = tables
            .absences
            .iter_mut()
            .find(|request| request.id == id)
            .ok_or_else(|| StoreError::AbsenceNotFound(id.to_string()))?;
        if request.status != AbsenceStatus::Pending {
            return Err(StoreError::AlreadyDecided {
                id: request.id.clone(),
                status: request.status,
            });
        }
        request.status = status;
        Ok(request.clone())
    }
}
