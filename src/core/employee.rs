//! Employee business logic - Handles employee records and their schedules.
//!
//! An [`EmployeeSchedule`] bundles an employee with every engagement they are assigned
//! to and every leave they own. It is the input of the availability engine and the
//! status resolver, which are pure functions over it.

use crate::{
    entities::{
        Employee, Engagement, Leave,
        employee::{self, UserType},
        engagement, leave,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use tracing::{debug, instrument};

/// An employee together with all of their commitments.
///
/// Engagements and leaves are kept in creation order (ascending id), which is the
/// order the status resolver scans them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeSchedule {
    /// The employee
    pub employee: employee::Model,
    /// Engagements the employee is assigned to
    pub engagements: Vec<engagement::Model>,
    /// Leaves owned by the employee
    pub leaves: Vec<leave::Model>,
}

impl EmployeeSchedule {
    /// Every commitment as an inclusive `(start, end)` pair, engagements first.
    pub fn commitments(&self) -> impl Iterator<Item = (NaiveDate, NaiveDate)> + '_ {
        self.engagements
            .iter()
            .map(|eng| (eng.start_date, eng.end_date))
            .chain(self.leaves.iter().map(|lev| (lev.start_date, lev.end_date)))
    }
}

/// Fields needed to create an employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    /// Unique login name
    pub username: String,
    /// Display name
    pub full_name: String,
    /// Contact address
    pub email: String,
    /// Manager or employee
    pub user_type: UserType,
    /// Linked Discord account, if any
    pub discord_user_id: Option<String>,
    /// First day with the team
    pub date_joined: NaiveDate,
}

/// Creates a new active employee after validating the username and name.
pub async fn create_employee(db: &DatabaseConnection, new: NewEmployee) -> Result<employee::Model> {
    let username = new.username.trim().to_lowercase();
    if username.is_empty() {
        return Err(Error::InvalidInput {
            message: "Username cannot be empty".to_string(),
        });
    }
    if new.full_name.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Employee name cannot be empty".to_string(),
        });
    }

    let employee = employee::ActiveModel {
        username: Set(username),
        full_name: Set(new.full_name.trim().to_string()),
        email: Set(new.email.trim().to_lowercase()),
        user_type: Set(new.user_type),
        is_active: Set(true),
        discord_user_id: Set(new.discord_user_id),
        date_joined: Set(new.date_joined),
        ..Default::default()
    };

    employee.insert(db).await.map_err(Into::into)
}

/// Finds an employee by primary key.
pub async fn get_employee_by_id(
    db: &DatabaseConnection,
    employee_id: i64,
) -> Result<Option<employee::Model>> {
    Employee::find_by_id(employee_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an employee by username (case-insensitive) or exact full name.
pub async fn find_employee(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<employee::Model>> {
    let name = name.trim();
    if let Some(found) = Employee::find()
        .filter(employee::Column::Username.eq(name.to_lowercase()))
        .one(db)
        .await?
    {
        return Ok(Some(found));
    }

    Employee::find()
        .filter(employee::Column::FullName.eq(name))
        .order_by_asc(employee::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the employee linked to a Discord account.
pub async fn get_employee_by_discord_id(
    db: &DatabaseConnection,
    discord_user_id: &str,
) -> Result<Option<employee::Model>> {
    Employee::find()
        .filter(employee::Column::DiscordUserId.eq(discord_user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all active employees ordered by name.
pub async fn get_active_employees(db: &DatabaseConnection) -> Result<Vec<employee::Model>> {
    Employee::find()
        .filter(employee::Column::IsActive.eq(true))
        .order_by_asc(employee::Column::FullName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all active managers; they receive engagement and leave notifications.
pub async fn get_managers(db: &DatabaseConnection) -> Result<Vec<employee::Model>> {
    Employee::find()
        .filter(employee::Column::IsActive.eq(true))
        .filter(employee::Column::UserType.eq(UserType::Manager))
        .order_by_asc(employee::Column::FullName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks an employee inactive. Their history stays in place.
pub async fn deactivate_employee(
    db: &DatabaseConnection,
    employee_id: i64,
) -> Result<employee::Model> {
    let employee = get_employee_by_id(db, employee_id)
        .await?
        .ok_or_else(|| Error::EmployeeNotFound {
            name: employee_id.to_string(),
        })?;

    let mut active_model: employee::ActiveModel = employee.into();
    active_model.is_active = Set(false);
    active_model.update(db).await.map_err(Into::into)
}

/// Loads an employee together with their engagements and leaves.
///
/// An employee without any records gets empty lists, not an error.
#[instrument(skip(db))]
pub async fn load_schedule(db: &DatabaseConnection, employee_id: i64) -> Result<EmployeeSchedule> {
    let employee = get_employee_by_id(db, employee_id)
        .await?
        .ok_or_else(|| Error::EmployeeNotFound {
            name: employee_id.to_string(),
        })?;
    schedule_for(db, employee).await
}

/// Loads the schedules of every active employee, ordered by name.
pub async fn load_active_schedules(db: &DatabaseConnection) -> Result<Vec<EmployeeSchedule>> {
    let employees = get_active_employees(db).await?;
    let mut schedules = Vec::with_capacity(employees.len());
    for employee in employees {
        schedules.push(schedule_for(db, employee).await?);
    }
    debug!("Loaded {} active schedules", schedules.len());
    Ok(schedules)
}

async fn schedule_for(
    db: &DatabaseConnection,
    employee: employee::Model,
) -> Result<EmployeeSchedule> {
    let engagements = employee
        .find_related(Engagement)
        .order_by_asc(engagement::Column::Id)
        .all(db)
        .await?;
    let leaves = employee
        .find_related(Leave)
        .order_by_asc(leave::Column::Id)
        .all(db)
        .await?;

    Ok(EmployeeSchedule {
        employee,
        engagements,
        leaves,
    })
}
