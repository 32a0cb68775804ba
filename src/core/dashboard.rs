//! Team-wide aggregates for the dashboard and workload views.
//!
//! Every aggregate here is a pure function over loaded schedules and engagements, with a
//! thin async loader next to it. Empty teams and empty engagement lists produce zeros.

use crate::{
    config::Settings,
    core::{
        availability::has_conflict,
        employee::{EmployeeSchedule, load_active_schedules, load_schedule},
        engagement::{EngagementPhase, get_all_engagements, phase},
        status::{StatusKind, current_status},
        utilization::{UtilizationBucket, team_utilization, utilization_bucket, utilization_rate},
    },
    entities::{employee::UserType, engagement, leave},
    errors::Result,
};
use chrono::{Duration, NaiveDate};
use sea_orm::DatabaseConnection;
use serde::Serialize;

/// Trailing window for "recent leaves" in a workload summary
pub const RECENT_LEAVE_DAYS: i64 = 30;

/// Number of upcoming engagements listed in a workload summary
pub const UPCOMING_LIMIT: usize = 3;

/// One employee's current and upcoming load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadSummary {
    /// Employee id
    pub employee_id: i64,
    /// Employee display name
    pub full_name: String,
    /// Engagements in progress today
    pub current_engagements: Vec<engagement::Model>,
    /// Next engagements to start, soonest first
    pub upcoming_engagements: Vec<engagement::Model>,
    /// Leaves that started in the trailing window
    pub recent_leaves: Vec<leave::Model>,
    /// Utilization over the configured window
    pub utilization_rate: f64,
    /// Every engagement the employee was ever assigned to
    pub total_engagements: usize,
}

/// Workload of one employee on `today`.
#[must_use]
pub fn workload(schedule: &EmployeeSchedule, settings: &Settings, today: NaiveDate) -> WorkloadSummary {
    let current_engagements = schedule
        .engagements
        .iter()
        .filter(|eng| phase(eng, today) == EngagementPhase::Ongoing)
        .cloned()
        .collect();

    let mut upcoming: Vec<&engagement::Model> = schedule
        .engagements
        .iter()
        .filter(|eng| phase(eng, today) == EngagementPhase::Upcoming)
        .collect();
    upcoming.sort_by_key(|eng| (eng.start_date, eng.id));

    let since = today - Duration::days(RECENT_LEAVE_DAYS);
    let recent_leaves = schedule
        .leaves
        .iter()
        .filter(|lev| since <= lev.start_date && lev.start_date <= today)
        .cloned()
        .collect();

    WorkloadSummary {
        employee_id: schedule.employee.id,
        full_name: schedule.employee.full_name.clone(),
        current_engagements,
        upcoming_engagements: upcoming.into_iter().take(UPCOMING_LIMIT).cloned().collect(),
        recent_leaves,
        utilization_rate: utilization_rate(schedule, settings.utilization.window_days, today),
        total_engagements: schedule.engagements.len(),
    }
}

/// Loads an employee's schedule and computes their workload.
pub async fn employee_workload(
    db: &DatabaseConnection,
    employee_id: i64,
    settings: &Settings,
    today: NaiveDate,
) -> Result<WorkloadSummary> {
    let schedule = load_schedule(db, employee_id).await?;
    Ok(workload(&schedule, settings, today))
}

/// Head counts by current status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    /// Without commitments today
    pub available: usize,
    /// On an engagement
    pub engaged: usize,
    /// In training
    pub training: usize,
    /// On vacation
    pub vacation: usize,
    /// Working from home
    pub work_from_home: usize,
}

impl StatusCounts {
    fn add(&mut self, kind: StatusKind) {
        match kind {
            StatusKind::Available => self.available += 1,
            StatusKind::Engaged => self.engaged += 1,
            StatusKind::Training => self.training += 1,
            StatusKind::Vacation => self.vacation += 1,
            StatusKind::WorkFromHome => self.work_from_home += 1,
        }
    }
}

/// Head counts by utilization bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    /// At or above the high threshold
    pub high: usize,
    /// Between the thresholds
    pub medium: usize,
    /// Below the medium threshold
    pub low: usize,
}

/// Team statistics for the team view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStatistics {
    /// Active employees
    pub total: usize,
    /// Active managers
    pub managers: usize,
    /// Active non-manager employees
    pub employees: usize,
    /// By status today
    pub by_status: StatusCounts,
    /// By utilization bucket
    pub utilization_buckets: BucketCounts,
    /// Mean utilization
    pub team_utilization: f64,
}

/// Statistics over the given schedules.
#[must_use]
pub fn team_statistics(
    schedules: &[EmployeeSchedule],
    settings: &Settings,
    today: NaiveDate,
) -> TeamStatistics {
    let mut by_status = StatusCounts::default();
    let mut buckets = BucketCounts::default();
    let mut rates = Vec::with_capacity(schedules.len());

    for schedule in schedules {
        by_status.add(current_status(schedule, today).kind);

        let rate = utilization_rate(schedule, settings.utilization.window_days, today);
        match utilization_bucket(rate, &settings.utilization) {
            UtilizationBucket::High => buckets.high += 1,
            UtilizationBucket::Medium => buckets.medium += 1,
            UtilizationBucket::Low => buckets.low += 1,
        }
        rates.push(rate);
    }

    let managers = schedules
        .iter()
        .filter(|schedule| schedule.employee.user_type == UserType::Manager)
        .count();

    TeamStatistics {
        total: schedules.len(),
        managers,
        employees: schedules.len() - managers,
        by_status,
        utilization_buckets: buckets,
        team_utilization: team_utilization(&rates),
    }
}

/// Landing-page summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Engagements not yet started
    pub upcoming_engagements: usize,
    /// Engagements in progress
    pub ongoing_engagements: usize,
    /// Finished engagements
    pub completed_engagements: usize,
    /// Active employees
    pub total_employees: usize,
    /// Employees with any commitment today
    pub engaged_employees: usize,
    /// Employees free today
    pub available_employees: usize,
    /// Share of busy employees today, two decimals
    pub busy_percentage: f64,
}

/// Dashboard summary from loaded data.
#[must_use]
pub fn dashboard_summary(
    engagements: &[engagement::Model],
    schedules: &[EmployeeSchedule],
    today: NaiveDate,
) -> DashboardSummary {
    let count_phase = |wanted: EngagementPhase| {
        engagements
            .iter()
            .filter(|eng| phase(eng, today) == wanted)
            .count()
    };

    let engaged = schedules
        .iter()
        .filter(|schedule| has_conflict(schedule, today, today))
        .count();
    let total = schedules.len();
    let busy_percentage = if total == 0 {
        0.0
    } else {
        // Cast safety: head counts are small
        #[allow(clippy::cast_precision_loss)]
        let share = engaged as f64 / total as f64 * 100.0;
        (share * 100.0).round() / 100.0
    };

    DashboardSummary {
        upcoming_engagements: count_phase(EngagementPhase::Upcoming),
        ongoing_engagements: count_phase(EngagementPhase::Ongoing),
        completed_engagements: count_phase(EngagementPhase::Completed),
        total_employees: total,
        engaged_employees: engaged,
        available_employees: total - engaged,
        busy_percentage,
    }
}

/// Loads every engagement and active schedule and builds the dashboard summary.
pub async fn load_dashboard(db: &DatabaseConnection, today: NaiveDate) -> Result<DashboardSummary> {
    let engagements = get_all_engagements(db).await?;
    let schedules = load_active_schedules(db).await?;
    Ok(dashboard_summary(&engagements, &schedules, today))
}

/// Loads every active schedule and builds the team statistics.
pub async fn load_team_statistics(
    db: &DatabaseConnection,
    settings: &Settings,
    today: NaiveDate,
) -> Result<TeamStatistics> {
    let schedules = load_active_schedules(db).await?;
    Ok(team_statistics(&schedules, settings, today))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_workload_splits_current_and_upcoming() {
        let schedule = schedule_with(
            &[
                (date(2024, 1, 1), date(2024, 1, 20)),
                (date(2024, 3, 1), date(2024, 3, 5)),
                (date(2024, 2, 1), date(2024, 2, 5)),
                (date(2024, 4, 1), date(2024, 4, 5)),
                (date(2024, 5, 1), date(2024, 5, 5)),
                (date(2023, 6, 1), date(2023, 6, 5)),
            ],
            &[
                (date(2024, 1, 2), date(2024, 1, 2)),
                (date(2023, 11, 1), date(2023, 11, 2)),
            ],
        );
        let summary = workload(&schedule, &Settings::default(), date(2024, 1, 10));

        assert_eq!(summary.current_engagements.len(), 1);
        let upcoming: Vec<NaiveDate> = summary
            .upcoming_engagements
            .iter()
            .map(|eng| eng.start_date)
            .collect();
        assert_eq!(upcoming, vec![date(2024, 2, 1), date(2024, 3, 1), date(2024, 4, 1)]);
        assert_eq!(summary.recent_leaves.len(), 1);
        assert_eq!(summary.total_engagements, 6);
        // Busy every day of the 30-day window ending Jan 10 from Jan 1
        assert_eq!(summary.utilization_rate, 33.33);
    }

    #[test]
    fn test_workload_without_records() {
        let summary = workload(&schedule_with(&[], &[]), &Settings::default(), date(2024, 1, 10));
        assert!(summary.current_engagements.is_empty());
        assert!(summary.upcoming_engagements.is_empty());
        assert_eq!(summary.utilization_rate, 0.0);
    }

    #[test]
    fn test_team_statistics_counts() {
        let today = date(2024, 1, 10);
        let engaged = schedule_with(&[(date(2023, 12, 1), date(2024, 1, 31))], &[]);
        let mut on_vacation = schedule_with(&[], &[(date(2024, 1, 10), date(2024, 1, 12))]);
        on_vacation.employee.user_type = UserType::Manager;
        let idle = schedule_with(&[], &[]);

        let stats = team_statistics(&[engaged, on_vacation, idle], &Settings::default(), today);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.managers, 1);
        assert_eq!(stats.employees, 2);
        assert_eq!(stats.by_status.engaged, 1);
        assert_eq!(stats.by_status.vacation, 1);
        assert_eq!(stats.by_status.available, 1);
        assert_eq!(stats.utilization_buckets.high, 1);
        assert_eq!(stats.utilization_buckets.low, 2);
        // (100 + 3.33 + 0) / 3
        assert_eq!(stats.team_utilization, 34.44);
    }

    #[test]
    fn test_team_statistics_empty_team() {
        let stats = team_statistics(&[], &Settings::default(), date(2024, 1, 1));
        assert_eq!(stats.total, 0);
        assert_eq!(stats.team_utilization, 0.0);
    }

    #[test]
    fn test_dashboard_summary() {
        let today = date(2024, 1, 10);
        let engagements = vec![
            engagement_model(1, date(2024, 1, 1), date(2024, 1, 5)),
            engagement_model(2, date(2024, 1, 8), date(2024, 1, 12)),
            engagement_model(3, date(2024, 1, 10), date(2024, 1, 10)),
            engagement_model(4, date(2024, 2, 1), date(2024, 2, 5)),
        ];
        let schedules = vec![
            schedule_with(&[(date(2024, 1, 8), date(2024, 1, 12))], &[]),
            schedule_with(&[], &[(date(2024, 1, 10), date(2024, 1, 10))]),
            schedule_with(&[], &[]),
            schedule_with(&[(date(2024, 2, 1), date(2024, 2, 5))], &[]),
        ];
        let summary = dashboard_summary(&engagements, &schedules, today);
        assert_eq!(summary.completed_engagements, 1);
        assert_eq!(summary.ongoing_engagements, 2);
        assert_eq!(summary.upcoming_engagements, 1);
        assert_eq!(summary.engaged_employees, 2);
        assert_eq!(summary.available_employees, 2);
        assert_eq!(summary.busy_percentage, 50.0);
    }

    #[test]
    fn test_dashboard_summary_without_employees() {
        let summary = dashboard_summary(&[], &[], date(2024, 1, 10));
        assert_eq!(summary.total_employees, 0);
        assert_eq!(summary.busy_percentage, 0.0);
    }

    #[tokio::test]
    async fn test_load_dashboard_from_store() -> Result<()> {
        let db = setup_test_db().await?;
        let busy = create_test_employee(&db, "busy").await?;
        create_test_employee(&db, "free").await?;
        let engagement =
            create_test_engagement(&db, "Red Team", date(2024, 1, 1), date(2024, 1, 20)).await?;
        assign_test_employee(&db, engagement.id, busy.id).await?;

        let summary = load_dashboard(&db, date(2024, 1, 10)).await?;
        assert_eq!(summary.ongoing_engagements, 1);
        assert_eq!(summary.engaged_employees, 1);
        assert_eq!(summary.available_employees, 1);

        let workload = employee_workload(&db, busy.id, &Settings::default(), date(2024, 1, 10)).await?;
        assert_eq!(workload.current_engagements.len(), 1);
        Ok(())
    }
}
