//! Shared test utilities for `StaffingBuddy`.
//!
//! Two kinds of helpers live here: in-memory model builders for the pure engine tests,
//! and store helpers that create records with sensible defaults in an in-memory
//! `SQLite` database.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{
        client, dates::DateRange, employee, employee::EmployeeSchedule, engagement, leave,
        service, vulnerability,
    },
    entities::{
        self,
        employee::UserType,
        leave::LeaveType,
        vulnerability::{Severity, VulnerabilityStatus},
    },
    errors::Result,
    notify::{NoopDispatcher, Notification, NotificationDispatcher},
};
use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;
use std::sync::Mutex;

/// Shorthand for a calendar date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// In-memory employee with id 1 who joined long before any test date.
pub fn employee_model() -> entities::employee::Model {
    entities::employee::Model {
        id: 1,
        username: "tester".to_string(),
        full_name: "Test Employee".to_string(),
        email: "tester@example.com".to_string(),
        user_type: UserType::Employee,
        is_active: true,
        discord_user_id: None,
        date_joined: date(2000, 1, 1),
    }
}

/// In-memory engagement named `Engagement {id}`.
pub fn engagement_model(id: i64, start: NaiveDate, end: NaiveDate) -> entities::engagement::Model {
    entities::engagement::Model {
        id,
        name: format!("Engagement {id}"),
        client_id: 1,
        service_id: 1,
        start_date: start,
        end_date: end,
        scope: None,
        created_at: Utc::now(),
    }
}

/// In-memory client with id 1.
pub fn client_model(name: &str) -> entities::client::Model {
    entities::client::Model {
        id: 1,
        name: name.to_string(),
        acronym: name.to_uppercase(),
        code: format!("{name}-001"),
    }
}

/// In-memory vulnerability recorded at 09:00 UTC on `created`.
pub fn vulnerability_model(
    severity: Severity,
    status: VulnerabilityStatus,
    created: NaiveDate,
) -> entities::vulnerability::Model {
    let created_at = created.and_hms_opt(9, 0, 0).unwrap().and_utc();
    entities::vulnerability::Model {
        id: 1,
        engagement_id: 1,
        title: format!("{severity:?} finding"),
        severity,
        status,
        created_at,
        fixed_at: (status == VulnerabilityStatus::Fixed).then_some(created_at),
        created_by: None,
        fixed_by: None,
    }
}

/// Open finding of the given severity
pub fn open_vulnerability(severity: Severity) -> entities::vulnerability::Model {
    vulnerability_model(severity, VulnerabilityStatus::Open, date(2024, 1, 1))
}

/// Fixed finding of the given severity
pub fn fixed_vulnerability(severity: Severity) -> entities::vulnerability::Model {
    vulnerability_model(severity, VulnerabilityStatus::Fixed, date(2024, 1, 1))
}

/// Builds a schedule for [`employee_model`] from `(start, end)` pairs.
///
/// Ids ascend in the order given. Leaves default to a vacation noted "Test leave".
pub fn schedule_with(
    engagements: &[(NaiveDate, NaiveDate)],
    leaves: &[(NaiveDate, NaiveDate)],
) -> EmployeeSchedule {
    let employee = employee_model();
    let leaves = (1..)
        .zip(leaves)
        .map(|(id, (start, end))| entities::leave::Model {
            id,
            employee_id: employee.id,
            leave_type: LeaveType::Vacation,
            start_date: *start,
            end_date: *end,
            note: "Test leave".to_string(),
            created_at: Utc::now(),
        })
        .collect();

    EmployeeSchedule {
        engagements: (1..)
            .zip(engagements)
            .map(|(id, (start, end))| engagement_model(id, *start, *end))
            .collect(),
        leaves,
        employee,
    }
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

fn new_employee(username: &str, user_type: UserType) -> employee::NewEmployee {
    employee::NewEmployee {
        username: username.to_string(),
        full_name: format!("{username} Test"),
        email: format!("{username}@example.com"),
        user_type,
        discord_user_id: None,
        date_joined: date(2020, 1, 1),
    }
}

/// Creates an active employee named `"{username} Test"`.
pub async fn create_test_employee(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::employee::Model> {
    employee::create_employee(db, new_employee(username, UserType::Employee)).await
}

/// Creates an active manager named `"{username} Test"`.
pub async fn create_test_manager(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::employee::Model> {
    employee::create_employee(db, new_employee(username, UserType::Manager)).await
}

/// Creates a client with a derived acronym and code.
pub async fn create_test_client(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::client::Model> {
    let acronym: String = name.chars().take(4).collect();
    client::create_client(db, name, &acronym, &format!("{acronym}-001")).await
}

/// Creates a service with a derived short name.
pub async fn create_test_service(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::service::Model> {
    let short_name: String = name.split_whitespace().filter_map(|w| w.chars().next()).collect();
    service::create_service(db, name, &short_name).await
}

/// Creates an engagement for the shared "Test Client" and "Test Service".
pub async fn create_test_engagement(
    db: &DatabaseConnection,
    name: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<entities::engagement::Model> {
    let client = match client::find_client(db, "Test Client").await? {
        Some(found) => found,
        None => create_test_client(db, "Test Client").await?,
    };
    let service = match service::find_service(db, "Test Service").await? {
        Some(found) => found,
        None => create_test_service(db, "Test Service").await?,
    };

    engagement::create_engagement(
        db,
        &NoopDispatcher,
        engagement::NewEngagement {
            name: name.to_string(),
            client_id: client.id,
            service_id: service.id,
            dates: DateRange::new(start, end)?,
            scope: None,
        },
    )
    .await
}

/// Adds an employee to an engagement without notifications.
pub async fn assign_test_employee(
    db: &DatabaseConnection,
    engagement_id: i64,
    employee_id: i64,
) -> Result<()> {
    engagement::assign_employee(db, &NoopDispatcher, engagement_id, employee_id).await?;
    Ok(())
}

/// Books a vacation noted "Test leave".
pub async fn create_test_leave(
    db: &DatabaseConnection,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<entities::leave::Model> {
    leave::create_leave(
        db,
        &NoopDispatcher,
        employee_id,
        LeaveType::Vacation,
        DateRange::new(start, end)?,
        "Test leave",
    )
    .await
}

/// Records an open finding on an engagement.
pub async fn create_test_vulnerability(
    db: &DatabaseConnection,
    engagement_id: i64,
    severity: Severity,
) -> Result<entities::vulnerability::Model> {
    vulnerability::create_vulnerability(db, engagement_id, "Test finding", severity, None).await
}

/// Dispatcher that keeps every notification for inspection.
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingDispatcher {
    /// Returns and clears the recorded notifications.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn dispatch(&self, notification: Notification) {
        self.sent.lock().unwrap().push(notification);
    }
}
