//! Leave business logic - Booking and cancelling absences.

use crate::{
    core::{dates::DateRange, employee::get_managers},
    entities::{Employee, Leave, leave, leave::LeaveType},
    errors::{Error, Result},
    notify::{Notification, NotificationDispatcher, Recipient},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Books a leave for an employee and notifies the managers.
///
/// Overlap with the employee's engagements is allowed; the status resolver
/// reports the leave on those days.
#[instrument(skip(db, notifier))]
pub async fn create_leave(
    db: &DatabaseConnection,
    notifier: &dyn NotificationDispatcher,
    employee_id: i64,
    leave_type: LeaveType,
    dates: DateRange,
    note: &str,
) -> Result<leave::Model> {
    let employee = Employee::find_by_id(employee_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::EmployeeNotFound {
            name: employee_id.to_string(),
        })?;

    let leave = leave::ActiveModel {
        employee_id: Set(employee.id),
        leave_type: Set(leave_type),
        start_date: Set(dates.start()),
        end_date: Set(dates.end()),
        note: Set(note.trim().to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "{} booked {} for {}",
        employee.username,
        leave_type.label(),
        dates
    );

    let managers = get_managers(db).await?;
    notifier.dispatch(Notification::LeaveCreated {
        managers: managers.iter().map(Recipient::from).collect(),
        employee: Recipient::from(&employee),
        leave_type,
        start_date: leave.start_date,
        end_date: leave.end_date,
        note: leave.note.clone(),
    });

    Ok(leave)
}

/// Leaves of an employee, earliest first.
pub async fn get_leaves_for_employee(
    db: &DatabaseConnection,
    employee_id: i64,
) -> Result<Vec<leave::Model>> {
    Leave::find()
        .filter(leave::Column::EmployeeId.eq(employee_id))
        .order_by_asc(leave::Column::StartDate)
        .order_by_asc(leave::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Cancels a leave.
pub async fn delete_leave(db: &DatabaseConnection, leave_id: i64) -> Result<()> {
    let result = Leave::delete_by_id(leave_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::LeaveNotFound { id: leave_id });
    }
    Ok(())
}
