//! Availability engine.
//!
//! Answers two questions about an employee and an inclusive date range: does any of their
//! commitments (engagements or leaves) touch the range, and how many distinct days of the
//! range are busy. Both are pure functions over an [`EmployeeSchedule`] and never fail;
//! a range whose end precedes its start is treated as empty.

use crate::{
    core::{
        dates::{DateRange, inclusive_days, overlap_days},
        employee::{EmployeeSchedule, load_active_schedules},
    },
    entities::employee,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::HashSet;
use tracing::instrument;

/// Day-level availability of one employee over a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    /// Days in the requested range
    pub total_days: i64,
    /// Distinct days covered by at least one commitment
    pub busy_days: i64,
    /// `total_days - busy_days`
    pub available_days: i64,
    /// Share of available days, floored to a whole percent
    pub percentage: i64,
}

/// Whether any engagement or leave of the employee shares a day with `[start, end]`.
#[must_use]
pub fn has_conflict(schedule: &EmployeeSchedule, start: NaiveDate, end: NaiveDate) -> bool {
    schedule
        .commitments()
        .any(|(c_start, c_end)| overlap_days(start, end, c_start, c_end) > 0)
}

/// Counts busy and available days of `[start, end]` for the employee.
///
/// A day covered by several commitments (an engagement and a leave on the same day,
/// or two overlapping engagements) is counted once. An empty range reports 100%.
#[must_use]
pub fn availability(schedule: &EmployeeSchedule, start: NaiveDate, end: NaiveDate) -> Availability {
    let total_days = inclusive_days(start, end);
    if total_days <= 0 {
        return Availability {
            total_days: 0,
            busy_days: 0,
            available_days: 0,
            percentage: 100,
        };
    }

    let busy_days = busy_days(schedule, start, end).len();
    // Cast safety: busy days are a subset of the range, which fits in i64
    #[allow(clippy::cast_possible_wrap)]
    let busy_days = busy_days as i64;
    let available_days = total_days - busy_days;

    Availability {
        total_days,
        busy_days,
        available_days,
        percentage: available_days * 100 / total_days,
    }
}

/// The set of days in `[start, end]` covered by at least one commitment.
#[must_use]
pub fn busy_days(schedule: &EmployeeSchedule, start: NaiveDate, end: NaiveDate) -> HashSet<NaiveDate> {
    let mut busy = HashSet::new();
    for (c_start, c_end) in schedule.commitments() {
        let from = start.max(c_start);
        let to = end.min(c_end);
        busy.extend(from.iter_days().take_while(|day| *day <= to));
    }
    busy
}

/// Active employees with no commitment touching the range, ordered by name.
#[instrument(skip(db))]
pub async fn find_available_employees(
    db: &DatabaseConnection,
    range: DateRange,
) -> Result<Vec<employee::Model>> {
    let schedules = load_active_schedules(db).await?;
    Ok(available_in(&schedules, range))
}

/// Pure counterpart of [`find_available_employees`].
#[must_use]
pub fn available_in(schedules: &[EmployeeSchedule], range: DateRange) -> Vec<employee::Model> {
    schedules
        .iter()
        .filter(|schedule| !has_conflict(schedule, range.start(), range.end()))
        .map(|schedule| schedule.employee.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_conflict_on_shared_boundary_day() {
        let schedule = schedule_with(&[(date(2024, 1, 1), date(2024, 1, 10))], &[]);
        assert!(has_conflict(&schedule, date(2024, 1, 10), date(2024, 1, 15)));
    }

    #[test]
    fn test_no_conflict_after_engagement_ends() {
        let schedule = schedule_with(&[(date(2024, 1, 1), date(2024, 1, 10))], &[]);
        assert!(!has_conflict(&schedule, date(2024, 1, 11), date(2024, 1, 15)));
    }

    #[test]
    fn test_conflict_with_range_start_boundary() {
        // Busy exactly on the last day of the requested range
        let schedule = schedule_with(&[], &[(date(2024, 3, 15), date(2024, 3, 20))]);
        assert!(has_conflict(&schedule, date(2024, 3, 1), date(2024, 3, 15)));
        assert!(!has_conflict(&schedule, date(2024, 3, 1), date(2024, 3, 14)));
    }

    #[test]
    fn test_single_day_against_single_day() {
        let schedule = schedule_with(&[], &[(date(2024, 5, 5), date(2024, 5, 5))]);
        assert!(has_conflict(&schedule, date(2024, 5, 5), date(2024, 5, 5)));
        assert!(!has_conflict(&schedule, date(2024, 5, 6), date(2024, 5, 6)));
    }

    #[test]
    fn test_disjoint_ranges_never_conflict() {
        let commitment = (date(2024, 6, 10), date(2024, 6, 20));
        let schedule = schedule_with(&[commitment], &[]);
        for offset in 1..30 {
            let end = commitment.0 - chrono::Duration::days(offset);
            let start = end - chrono::Duration::days(5);
            assert!(!has_conflict(&schedule, start, end));
        }
    }

    #[test]
    fn test_overlapping_ranges_always_conflict() {
        let commitment = (date(2024, 6, 10), date(2024, 6, 20));
        let schedule = schedule_with(&[commitment], &[]);
        for day in DateRange::new(commitment.0, commitment.1).unwrap().days() {
            assert!(has_conflict(&schedule, day, day));
            assert!(has_conflict(&schedule, day - chrono::Duration::days(3), day));
        }
    }

    #[test]
    fn test_no_commitments_means_no_conflict() {
        let schedule = schedule_with(&[], &[]);
        assert!(!has_conflict(&schedule, date(2024, 1, 1), date(2024, 12, 31)));
        let result = availability(&schedule, date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(result.busy_days, 0);
        assert_eq!(result.percentage, 100);
    }

    #[test]
    fn test_single_day_availability() {
        let schedule = schedule_with(&[(date(2024, 1, 1), date(2024, 1, 10))], &[]);

        let busy = availability(&schedule, date(2024, 1, 5), date(2024, 1, 5));
        assert_eq!(busy.total_days, 1);
        assert_eq!(busy.busy_days, 1);
        assert_eq!(busy.percentage, 0);

        let free = availability(&schedule, date(2024, 1, 11), date(2024, 1, 11));
        assert_eq!(free.total_days, 1);
        assert_eq!(free.busy_days, 0);
        assert_eq!(free.percentage, 100);
    }

    #[test]
    fn test_double_booked_day_counts_once() {
        // Engagement and leave both cover Jan 5
        let schedule = schedule_with(
            &[(date(2024, 1, 1), date(2024, 1, 5))],
            &[(date(2024, 1, 5), date(2024, 1, 5))],
        );
        let result = availability(&schedule, date(2024, 1, 5), date(2024, 1, 5));
        assert_eq!(result.busy_days, 1);

        let week = availability(&schedule, date(2024, 1, 1), date(2024, 1, 7));
        assert_eq!(week.total_days, 7);
        assert_eq!(week.busy_days, 5);
        assert_eq!(week.available_days, 2);
        // 2 / 7 = 28.57% floored
        assert_eq!(week.percentage, 28);
    }

    #[test]
    fn test_overlapping_engagements_count_once() {
        let schedule = schedule_with(
            &[
                (date(2024, 1, 1), date(2024, 1, 6)),
                (date(2024, 1, 4), date(2024, 1, 10)),
            ],
            &[],
        );
        let result = availability(&schedule, date(2024, 1, 1), date(2024, 1, 10));
        assert_eq!(result.busy_days, 10);
        assert_eq!(result.available_days, 0);
        assert_eq!(result.percentage, 0);
    }

    #[test]
    fn test_commitment_clipped_to_range() {
        let schedule = schedule_with(&[(date(2023, 12, 20), date(2024, 1, 3))], &[]);
        let result = availability(&schedule, date(2024, 1, 1), date(2024, 1, 10));
        assert_eq!(result.busy_days, 3);
        assert_eq!(result.available_days, 7);
        assert_eq!(result.percentage, 70);
    }

    #[test]
    fn test_inverted_range_is_fully_available() {
        let schedule = schedule_with(&[(date(2024, 1, 1), date(2024, 1, 10))], &[]);
        let result = availability(&schedule, date(2024, 1, 10), date(2024, 1, 1));
        assert_eq!(result.total_days, 0);
        assert_eq!(result.percentage, 100);
        assert!(!has_conflict(&schedule, date(2024, 1, 10), date(2024, 1, 1)));
    }

    #[test]
    fn test_availability_serializes_camel_case() {
        let schedule = schedule_with(&[], &[]);
        let result = availability(&schedule, date(2024, 1, 1), date(2024, 1, 2));
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["totalDays"], 2);
        assert_eq!(json["availableDays"], 2);
    }

    #[tokio::test]
    async fn test_find_available_employees() -> Result<()> {
        let db = setup_test_db().await?;
        let busy = create_test_employee(&db, "busy").await?;
        let on_leave = create_test_employee(&db, "away").await?;
        let free = create_test_employee(&db, "free").await?;

        let engagement =
            create_test_engagement(&db, "Red Team", date(2024, 1, 1), date(2024, 1, 10)).await?;
        assign_test_employee(&db, engagement.id, busy.id).await?;
        create_test_leave(&db, on_leave.id, date(2024, 1, 8), date(2024, 1, 9)).await?;

        let range = DateRange::new(date(2024, 1, 9), date(2024, 1, 12))?;
        let available = find_available_employees(&db, range).await?;
        let ids: Vec<i64> = available.iter().map(|emp| emp.id).collect();
        assert_eq!(ids, vec![free.id]);

        let later = DateRange::new(date(2024, 1, 11), date(2024, 1, 12))?;
        assert_eq!(find_available_employees(&db, later).await?.len(), 3);
        Ok(())
    }
}
