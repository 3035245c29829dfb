//! HR vertical slice: employee profiles, peer feedback and absence requests.
//!
//! Every [`HrService`] operation consults the caller's
//! [`AccessControl`](platform_authz::AccessControl) before it reads or mutates
//! the [`HrStore`].

pub mod model;
pub mod polish;
mod seed;
pub mod service;
pub mod store;

pub use model::{
    AbsenceKind, AbsenceRequest, AbsenceStats, AbsenceStatus, EmergencyContact, Employee, EmployeeView,
    Feedback, ProfileUpdate, SensitiveDetails,
};
pub use polish::{PatternPolisher, Polisher};
pub use service::{AbsenceDecision, AbsenceDraft, FeedbackDraft, HrError, HrResult, HrService};
pub use store::{HrStore, StoreError};
