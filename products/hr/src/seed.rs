//! Demo dataset loaded by [`HrStore::seeded`](crate::HrStore::seeded).

use chrono::{DateTime, NaiveDate, Utc};
use platform_authz::EmployeeId;

use crate::model::{
    AbsenceKind, AbsenceRequest, AbsenceStatus, EmergencyContact, Employee, Feedback,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn instant(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn employee(
    id: &str,
    name: &str,
    email: &str,
    position: &str,
    department: &str,
    manager: &str,
    start_date: NaiveDate,
    salary: u32,
    phone: &str,
    address: &str,
    contact: (&str, &str, &str),
) -> Employee {
    Employee {
        id: EmployeeId::new(id),
        name: name.into(),
        email: email.into(),
        position: position.into(),
        department: department.into(),
        manager: manager.into(),
        start_date,
        salary,
        phone: phone.into(),
        address: address.into(),
        emergency_contact: EmergencyContact {
            name: contact.0.into(),
            phone: contact.1.into(),
            relationship: contact.2.into(),
        },
        avatar: None,
    }
}

pub fn employees() -> Vec<Employee> {
    vec![
        employee(
            "1",
            "Sarah Johnson",
            "sarah.johnson@newwork.com",
            "Senior Software Engineer",
            "Engineering",
            "Michael Chen",
            date(2022, 3, 15),
            95_000,
            "+1 (555) 123-4567",
            "123 Tech Street, San Francisco, CA 94105",
            ("John Johnson", "+1 (555) 987-6543", "Spouse"),
        ),
        employee(
            "2",
            "Michael Chen",
            "michael.chen@newwork.com",
            "Engineering Manager",
            "Engineering",
            "Lisa Rodriguez",
            date(2021, 1, 10),
            120_000,
            "+1 (555) 234-5678",
            "456 Innovation Ave, San Francisco, CA 94107",
            ("Amy Chen", "+1 (555) 876-5432", "Spouse"),
        ),
        employee(
            "3",
            "Alex Rivera",
            "alex.rivera@newwork.com",
            "Product Designer",
            "Design",
            "Sarah Kim",
            date(2023, 6, 1),
            85_000,
            "+1 (555) 345-6789",
            "789 Creative Blvd, San Francisco, CA 94110",
            ("Maria Rivera", "+1 (555) 765-4321", "Mother"),
        ),
        employee(
            "4",
            "Zubair Ahmed",
            "zubair.ahmed@newwork.com",
            "Lead Engineer",
            "Analytics",
            "Michael Chen",
            date(2023, 1, 15),
            70_000,
            "+1 (555) 456-7890",
            "321 Data St, San Francisco, CA 94111",
            ("Ali Ahmed", "+1 (555) 654-3210", "Brother"),
        ),
    ]
}

pub fn feedback() -> Vec<Feedback> {
    vec![
        Feedback {
            id: "1".into(),
            employee_id: EmployeeId::new("1"),
            author_id: "2".into(),
            author_name: "Michael Chen".into(),
            content: "Sarah consistently delivers high-quality code and mentors junior developers effectively. Her technical leadership on the API redesign project was exceptional.".into(),
            is_polished: false,
            original_content: None,
            created_at: instant("2024-01-15T10:30:00Z"),
        },
        Feedback {
            id: "2".into(),
            employee_id: EmployeeId::new("1"),
            author_id: "3".into(),
            author_name: "Alex Rivera".into(),
            content: "Working with Sarah on the user dashboard was great. She always explains technical concepts clearly and is very collaborative.".into(),
            is_polished: false,
            original_content: None,
            created_at: instant("2024-01-10T14:20:00Z"),
        },
    ]
}

pub fn absence_requests() -> Vec<AbsenceRequest> {
    vec![
        AbsenceRequest {
            id: "1".into(),
            employee_id: EmployeeId::new("1"),
            kind: AbsenceKind::Vacation,
            start_date: date(2024, 2, 15),
            end_date: date(2024, 2, 19),
            reason: "Family vacation to Hawaii".into(),
            status: AbsenceStatus::Approved,
            created_at: instant("2024-01-20T09:00:00Z"),
        },
        AbsenceRequest {
            id: "2".into(),
            employee_id: EmployeeId::new("3"),
            kind: AbsenceKind::Sick,
            start_date: date(2024, 1, 25),
            end_date: date(2024, 1, 25),
            reason: "Flu symptoms".into(),
            status: AbsenceStatus::Approved,
            created_at: instant("2024-01-25T08:30:00Z"),
        },
    ]
}
