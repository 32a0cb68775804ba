//! Engagement business logic - Scheduling, staffing and the per-engagement metrics.
//!
//! The phase of an engagement is derived from its dates and the current day, never
//! stored. Staffing changes go through [`set_engagement_employees`], which applies the
//! whole change in one transaction and only then notifies the people involved.

use crate::{
    config::Settings,
    core::{
        dates::{DateRange, inclusive_days},
        employee::get_managers,
        risk::{PriorityLevel, priority_level, risk_score},
    },
    entities::{
        Client, Employee, Engagement, EngagementEmployee, Service, Vulnerability, employee,
        engagement, engagement_employee, vulnerability,
    },
    errors::{Error, Result},
    notify::{EngagementInfo, Notification, NotificationDispatcher, Recipient},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{info, instrument};

/// Where an engagement stands relative to a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementPhase {
    /// Starts after today
    Upcoming,
    /// Today falls within its dates
    Ongoing,
    /// Ended before today
    Completed,
}

impl EngagementPhase {
    /// Capitalised label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Ongoing => "Ongoing",
            Self::Completed => "Completed",
        }
    }
}

/// Phase of `engagement` on `today`.
#[must_use]
pub fn phase(engagement: &engagement::Model, today: NaiveDate) -> EngagementPhase {
    if today < engagement.start_date {
        EngagementPhase::Upcoming
    } else if today > engagement.end_date {
        EngagementPhase::Completed
    } else {
        EngagementPhase::Ongoing
    }
}

/// Percentage of the engagement elapsed on `today`, floored.
///
/// Upcoming engagements are at 0 and completed ones at 100. The span is measured as
/// `end - start` in days, so a single-day engagement is at 100 as soon as it starts.
#[must_use]
pub fn progress_percent(engagement: &engagement::Model, today: NaiveDate) -> i64 {
    match phase(engagement, today) {
        EngagementPhase::Upcoming => 0,
        EngagementPhase::Completed => 100,
        EngagementPhase::Ongoing => {
            let total = (engagement.end_date - engagement.start_date).num_days();
            if total <= 0 {
                return 100;
            }
            let elapsed = (today - engagement.start_date).num_days();
            elapsed * 100 / total
        }
    }
}

/// Days left until the last day; 0 on the last day and negative once completed.
#[must_use]
pub fn days_remaining(engagement: &engagement::Model, today: NaiveDate) -> i64 {
    (engagement.end_date - today).num_days()
}

/// Ongoing with at most seven days left.
#[must_use]
pub fn is_ending_soon(engagement: &engagement::Model, today: NaiveDate) -> bool {
    phase(engagement, today) == EngagementPhase::Ongoing && days_remaining(engagement, today) <= 7
}

/// Attention score of an engagement given its findings.
///
/// Ongoing work scores 10, plus 5 in its final week. Work starting within two weeks
/// scores 3. Open findings add 5 when their risk score exceeds 50, or 2 above 20.
#[must_use]
pub fn priority_score(
    engagement: &engagement::Model,
    vulnerabilities: &[vulnerability::Model],
    today: NaiveDate,
) -> i64 {
    let mut score = match phase(engagement, today) {
        EngagementPhase::Ongoing if days_remaining(engagement, today) <= 7 => 15,
        EngagementPhase::Ongoing => 10,
        EngagementPhase::Upcoming if (engagement.start_date - today).num_days() <= 14 => 3,
        EngagementPhase::Upcoming | EngagementPhase::Completed => 0,
    };

    let risk = risk_score(vulnerabilities);
    if risk > 50 {
        score += 5;
    } else if risk > 20 {
        score += 2;
    }
    score
}

/// Phase-dependent day count shown next to an engagement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum DaysInfo {
    /// Days until the first day
    UntilStart(i64),
    /// Days until the last day
    Remaining(i64),
    /// Days since the last day
    SinceEnd(i64),
}

impl DaysInfo {
    /// Day count for `engagement` on `today`.
    #[must_use]
    pub fn for_engagement(engagement: &engagement::Model, today: NaiveDate) -> Self {
        match phase(engagement, today) {
            EngagementPhase::Upcoming => Self::UntilStart((engagement.start_date - today).num_days()),
            EngagementPhase::Ongoing => Self::Remaining(days_remaining(engagement, today)),
            EngagementPhase::Completed => Self::SinceEnd((today - engagement.end_date).num_days()),
        }
    }

    /// Short description such as `"5 days left"`
    #[must_use]
    pub fn describe(self) -> String {
        match self {
            Self::UntilStart(days) => format!("starts in {days} days"),
            Self::Remaining(days) => format!("{days} days left"),
            Self::SinceEnd(days) => format!("ended {days} days ago"),
        }
    }
}

/// Everything the engagement views show about one engagement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementSummary {
    /// The engagement
    pub engagement: engagement::Model,
    /// Phase on the reference day
    pub phase: EngagementPhase,
    /// Elapsed percentage
    pub progress: i64,
    /// Phase-dependent day count
    pub days: DaysInfo,
    /// Ongoing with at most a week left
    pub ending_soon: bool,
    /// Number of assignees
    pub team_size: usize,
    /// Open findings
    pub open_vulnerabilities: usize,
    /// Open critical findings
    pub critical_vulnerabilities: usize,
    /// Risk score of the open findings
    pub risk_score: i64,
    /// Attention score
    pub priority_score: i64,
    /// Bucketed attention score
    pub priority: PriorityLevel,
    /// Inclusive days times team size times the configured day rate
    pub estimated_cost: u64,
}

/// Builds the summary from already loaded data.
#[must_use]
pub fn summarize(
    engagement: engagement::Model,
    team_size: usize,
    vulnerabilities: &[vulnerability::Model],
    settings: &Settings,
    today: NaiveDate,
) -> EngagementSummary {
    let open: Vec<&vulnerability::Model> = vulnerabilities
        .iter()
        .filter(|vuln| vuln.status == vulnerability::VulnerabilityStatus::Open)
        .collect();
    let critical = open
        .iter()
        .filter(|vuln| vuln.severity == vulnerability::Severity::Critical)
        .count();
    let score = priority_score(&engagement, vulnerabilities, today);
    let days = u64::try_from(inclusive_days(engagement.start_date, engagement.end_date)).unwrap_or(0);

    EngagementSummary {
        phase: phase(&engagement, today),
        progress: progress_percent(&engagement, today),
        days: DaysInfo::for_engagement(&engagement, today),
        ending_soon: is_ending_soon(&engagement, today),
        team_size,
        open_vulnerabilities: open.len(),
        critical_vulnerabilities: critical,
        risk_score: risk_score(vulnerabilities),
        priority_score: score,
        priority: priority_level(score),
        estimated_cost: days
            .saturating_mul(team_size as u64)
            .saturating_mul(settings.cost_per_day),
        engagement,
    }
}

/// Loads the team and findings of an engagement and summarizes it.
pub async fn engagement_summary(
    db: &DatabaseConnection,
    engagement: engagement::Model,
    settings: &Settings,
    today: NaiveDate,
) -> Result<EngagementSummary> {
    let team = get_engagement_employees(db, engagement.id).await?;
    let vulnerabilities = engagement.find_related(Vulnerability).all(db).await?;
    Ok(summarize(engagement, team.len(), &vulnerabilities, settings, today))
}

/// Fields needed to schedule an engagement.
#[derive(Debug, Clone)]
pub struct NewEngagement {
    /// Engagement name
    pub name: String,
    /// Owning client
    pub client_id: i64,
    /// Service delivered
    pub service_id: i64,
    /// Validated inclusive dates
    pub dates: DateRange,
    /// Optional scope description
    pub scope: Option<String>,
}

/// Creates an engagement and notifies the managers.
#[instrument(skip(db, notifier))]
pub async fn create_engagement(
    db: &DatabaseConnection,
    notifier: &dyn NotificationDispatcher,
    new: NewEngagement,
) -> Result<engagement::Model> {
    if new.name.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Engagement name cannot be empty".to_string(),
        });
    }
    let client = Client::find_by_id(new.client_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ClientNotFound {
            name: new.client_id.to_string(),
        })?;
    if Service::find_by_id(new.service_id).one(db).await?.is_none() {
        return Err(Error::ServiceNotFound {
            name: new.service_id.to_string(),
        });
    }

    let engagement = engagement::ActiveModel {
        name: Set(new.name.trim().to_string()),
        client_id: Set(client.id),
        service_id: Set(new.service_id),
        start_date: Set(new.dates.start()),
        end_date: Set(new.dates.end()),
        scope: Set(new.scope.filter(|scope| !scope.trim().is_empty())),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created engagement '{}' ({})", engagement.name, new.dates);

    let managers = get_managers(db).await?;
    notifier.dispatch(Notification::EngagementCreated {
        managers: managers.iter().map(Recipient::from).collect(),
        client: client.name,
        engagement: EngagementInfo::from(&engagement),
    });

    Ok(engagement)
}

/// Finds an engagement by primary key.
pub async fn get_engagement_by_id(
    db: &DatabaseConnection,
    engagement_id: i64,
) -> Result<Option<engagement::Model>> {
    Engagement::find_by_id(engagement_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the most recent engagement with the given name.
pub async fn find_engagement(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<engagement::Model>> {
    Engagement::find()
        .filter(engagement::Column::Name.eq(name.trim()))
        .order_by_desc(engagement::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every engagement, latest start first.
pub async fn get_all_engagements(db: &DatabaseConnection) -> Result<Vec<engagement::Model>> {
    Engagement::find()
        .order_by_desc(engagement::Column::StartDate)
        .order_by_asc(engagement::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Engagements in the given phase on `today`.
pub async fn list_by_phase(
    db: &DatabaseConnection,
    wanted: EngagementPhase,
    today: NaiveDate,
) -> Result<Vec<engagement::Model>> {
    let query = Engagement::find();
    let query = match wanted {
        EngagementPhase::Upcoming => query
            .filter(engagement::Column::StartDate.gt(today))
            .order_by_asc(engagement::Column::StartDate),
        EngagementPhase::Ongoing => query
            .filter(engagement::Column::StartDate.lte(today))
            .filter(engagement::Column::EndDate.gte(today))
            .order_by_asc(engagement::Column::EndDate),
        EngagementPhase::Completed => query
            .filter(engagement::Column::EndDate.lt(today))
            .order_by_desc(engagement::Column::EndDate),
    };
    query
        .order_by_asc(engagement::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Employees assigned to an engagement, ordered by name.
pub async fn get_engagement_employees(
    db: &DatabaseConnection,
    engagement_id: i64,
) -> Result<Vec<employee::Model>> {
    let engagement = get_engagement_by_id(db, engagement_id)
        .await?
        .ok_or_else(|| Error::EngagementNotFound {
            name: engagement_id.to_string(),
        })?;
    engagement
        .find_related(Employee)
        .order_by_asc(employee::Column::FullName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Who was added and who was removed by a staffing change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentChange {
    /// Newly assigned employees
    pub added: Vec<employee::Model>,
    /// Employees no longer assigned
    pub removed: Vec<employee::Model>,
}

impl AssignmentChange {
    /// Whether the change did anything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Replaces the engagement's assignees with `employee_ids`.
///
/// The difference between the previous and the new set is written in one transaction.
/// Once it has committed, every added employee gets an `EmployeeAssigned` notification
/// and every removed one an `EmployeeRemoved` notification.
#[instrument(skip(db, notifier))]
pub async fn set_engagement_employees(
    db: &DatabaseConnection,
    notifier: &dyn NotificationDispatcher,
    engagement_id: i64,
    employee_ids: &[i64],
) -> Result<AssignmentChange> {
    let engagement = get_engagement_by_id(db, engagement_id)
        .await?
        .ok_or_else(|| Error::EngagementNotFound {
            name: engagement_id.to_string(),
        })?;

    let txn = db.begin().await?;

    let before: BTreeSet<i64> = EngagementEmployee::find()
        .filter(engagement_employee::Column::EngagementId.eq(engagement_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|link| link.employee_id)
        .collect();
    let after: BTreeSet<i64> = employee_ids.iter().copied().collect();

    let mut change = AssignmentChange::default();

    for employee_id in after.difference(&before) {
        let employee = Employee::find_by_id(*employee_id)
            .one(&txn)
            .await?
            .ok_or_else(|| Error::EmployeeNotFound {
                name: employee_id.to_string(),
            })?;
        EngagementEmployee::insert(engagement_employee::ActiveModel {
            engagement_id: Set(engagement_id),
            employee_id: Set(*employee_id),
        })
        .exec(&txn)
        .await?;
        change.added.push(employee);
    }

    let removed_ids: Vec<i64> = before.difference(&after).copied().collect();
    if !removed_ids.is_empty() {
        change.removed = Employee::find()
            .filter(employee::Column::Id.is_in(removed_ids.clone()))
            .order_by_asc(employee::Column::Id)
            .all(&txn)
            .await?;
        EngagementEmployee::delete_many()
            .filter(engagement_employee::Column::EngagementId.eq(engagement_id))
            .filter(engagement_employee::Column::EmployeeId.is_in(removed_ids))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    info!(
        "Engagement '{}': {} assigned, {} removed",
        engagement.name,
        change.added.len(),
        change.removed.len()
    );

    let info = EngagementInfo::from(&engagement);
    for employee in &change.added {
        notifier.dispatch(Notification::EmployeeAssigned {
            employee: Recipient::from(employee),
            engagement: info.clone(),
        });
    }
    for employee in &change.removed {
        notifier.dispatch(Notification::EmployeeRemoved {
            employee: Recipient::from(employee),
            engagement: info.clone(),
        });
    }

    Ok(change)
}

/// Adds one employee to an engagement, keeping the current team.
pub async fn assign_employee(
    db: &DatabaseConnection,
    notifier: &dyn NotificationDispatcher,
    engagement_id: i64,
    employee_id: i64,
) -> Result<AssignmentChange> {
    let mut ids = current_assignee_ids(db, engagement_id).await?;
    ids.push(employee_id);
    set_engagement_employees(db, notifier, engagement_id, &ids).await
}

/// Removes one employee from an engagement, keeping the rest of the team.
pub async fn unassign_employee(
    db: &DatabaseConnection,
    notifier: &dyn NotificationDispatcher,
    engagement_id: i64,
    employee_id: i64,
) -> Result<AssignmentChange> {
    let ids: Vec<i64> = current_assignee_ids(db, engagement_id)
        .await?
        .into_iter()
        .filter(|id| *id != employee_id)
        .collect();
    set_engagement_employees(db, notifier, engagement_id, &ids).await
}

async fn current_assignee_ids(db: &DatabaseConnection, engagement_id: i64) -> Result<Vec<i64>> {
    Ok(EngagementEmployee::find()
        .filter(engagement_employee::Column::EngagementId.eq(engagement_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.employee_id)
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::vulnerability::Severity;
    use crate::test_utils::*;

    #[test]
    fn test_progress_halfway() {
        let eng = engagement_model(1, date(2024, 1, 1), date(2024, 1, 21));
        assert_eq!(progress_percent(&eng, date(2024, 1, 11)), 50);
    }

    #[test]
    fn test_progress_outside_dates() {
        let eng = engagement_model(1, date(2024, 1, 1), date(2024, 1, 21));
        assert_eq!(progress_percent(&eng, date(2023, 12, 31)), 0);
        assert_eq!(progress_percent(&eng, date(2024, 1, 1)), 0);
        assert_eq!(progress_percent(&eng, date(2024, 1, 21)), 100);
        assert_eq!(progress_percent(&eng, date(2024, 1, 22)), 100);
    }

    #[test]
    fn test_progress_single_day_engagement() {
        let eng = engagement_model(1, date(2024, 1, 5), date(2024, 1, 5));
        assert_eq!(progress_percent(&eng, date(2024, 1, 4)), 0);
        assert_eq!(progress_percent(&eng, date(2024, 1, 5)), 100);
    }

    #[test]
    fn test_progress_floors() {
        // 1 of 3 days elapsed: 33.3% floored
        let eng = engagement_model(1, date(2024, 1, 1), date(2024, 1, 4));
        assert_eq!(progress_percent(&eng, date(2024, 1, 2)), 33);
    }

    #[test]
    fn test_phases_and_days_info() {
        let eng = engagement_model(1, date(2024, 1, 10), date(2024, 1, 20));
        assert_eq!(phase(&eng, date(2024, 1, 9)), EngagementPhase::Upcoming);
        assert_eq!(phase(&eng, date(2024, 1, 10)), EngagementPhase::Ongoing);
        assert_eq!(phase(&eng, date(2024, 1, 20)), EngagementPhase::Ongoing);
        assert_eq!(phase(&eng, date(2024, 1, 21)), EngagementPhase::Completed);

        assert_eq!(DaysInfo::for_engagement(&eng, date(2024, 1, 5)), DaysInfo::UntilStart(5));
        assert_eq!(DaysInfo::for_engagement(&eng, date(2024, 1, 15)), DaysInfo::Remaining(5));
        assert_eq!(DaysInfo::for_engagement(&eng, date(2024, 1, 23)), DaysInfo::SinceEnd(3));
    }

    #[test]
    fn test_ending_soon_only_when_ongoing() {
        let eng = engagement_model(1, date(2024, 1, 1), date(2024, 1, 20));
        assert!(!is_ending_soon(&eng, date(2024, 1, 12)));
        assert!(is_ending_soon(&eng, date(2024, 1, 13)));
        assert!(is_ending_soon(&eng, date(2024, 1, 20)));
        assert!(!is_ending_soon(&eng, date(2024, 1, 21)));
    }

    #[test]
    fn test_priority_score_components() {
        let eng = engagement_model(1, date(2024, 1, 1), date(2024, 1, 31));
        // Ongoing, more than a week left
        assert_eq!(priority_score(&eng, &[], date(2024, 1, 10)), 10);
        // Final week
        assert_eq!(priority_score(&eng, &[], date(2024, 1, 25)), 15);
        // Starts in 14 days
        assert_eq!(priority_score(&eng, &[], date(2023, 12, 18)), 3);
        // Starts in 15 days
        assert_eq!(priority_score(&eng, &[], date(2023, 12, 17)), 0);
        assert_eq!(priority_score(&eng, &[], date(2024, 2, 1)), 0);
    }

    #[test]
    fn test_priority_score_vulnerability_bonus() {
        let eng = engagement_model(1, date(2024, 1, 1), date(2024, 1, 31));
        let after = date(2024, 3, 1);
        // Risk 21 → +2
        let medium = vec![
            open_vulnerability(Severity::Critical),
            open_vulnerability(Severity::Critical),
            open_vulnerability(Severity::Low),
        ];
        assert_eq!(priority_score(&eng, &medium, after), 2);
        // Risk exactly 20 gets nothing
        let twenty = vec![
            open_vulnerability(Severity::Critical),
            open_vulnerability(Severity::Critical),
        ];
        assert_eq!(priority_score(&eng, &twenty, after), 0);
        // Risk 60 → +5, final week → 15 + 5
        let high: Vec<_> = (0..6).map(|_| open_vulnerability(Severity::Critical)).collect();
        let score = priority_score(&eng, &high, date(2024, 1, 30));
        assert_eq!(score, 20);
        assert_eq!(priority_level(score), PriorityLevel::High);
    }

    #[test]
    fn test_summarize_estimates_cost() {
        let eng = engagement_model(1, date(2024, 1, 1), date(2024, 1, 10));
        let settings = Settings::default();
        let vulns = vec![
            open_vulnerability(Severity::Critical),
            fixed_vulnerability(Severity::High),
        ];
        let summary = summarize(eng, 3, &vulns, &settings, date(2024, 1, 2));
        assert_eq!(summary.estimated_cost, 10 * 3 * 1000);
        assert_eq!(summary.open_vulnerabilities, 1);
        assert_eq!(summary.critical_vulnerabilities, 1);
        assert_eq!(summary.risk_score, 10);
        assert_eq!(summary.phase, EngagementPhase::Ongoing);
        assert_eq!(summary.priority, PriorityLevel::Medium);
    }

    #[test]
    fn test_summarize_cost_saturates() {
        let eng = engagement_model(1, date(2024, 1, 1), date(2024, 12, 31));
        let settings = Settings {
            cost_per_day: u64::MAX / 2,
            ..Settings::default()
        };
        let summary = summarize(eng, 3, &[], &settings, date(2024, 1, 2));
        assert_eq!(summary.estimated_cost, u64::MAX);
    }

    #[tokio::test]
    async fn test_create_engagement_notifies_managers() -> Result<()> {
        let db = setup_test_db().await?;
        let manager = create_test_manager(&db, "boss").await?;
        let client = create_test_client(&db, "Acme").await?;
        let service = create_test_service(&db, "Penetration Test").await?;
        let notifier = RecordingDispatcher::default();

        let engagement = create_engagement(
            &db,
            &notifier,
            NewEngagement {
                name: "Acme External".to_string(),
                client_id: client.id,
                service_id: service.id,
                dates: DateRange::new(date(2024, 1, 1), date(2024, 1, 10))?,
                scope: Some("  ".to_string()),
            },
        )
        .await?;
        assert!(engagement.scope.is_none());

        let sent = notifier.take();
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            Notification::EngagementCreated {
                managers, client, ..
            } => {
                assert_eq!(client, "Acme");
                assert_eq!(managers[0].name, manager.full_name);
            }
            other => panic!("unexpected notification {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_create_engagement_unknown_client() -> Result<()> {
        let db = setup_test_db().await?;
        let service = create_test_service(&db, "Code Review").await?;
        let result = create_engagement(
            &db,
            &RecordingDispatcher::default(),
            NewEngagement {
                name: "Ghost".to_string(),
                client_id: 99,
                service_id: service.id,
                dates: DateRange::single_day(date(2024, 1, 1)),
                scope: None,
            },
        )
        .await;
        assert!(matches!(result, Err(Error::ClientNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_engagement_employees_diffs_and_notifies() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "alice").await?;
        let bob = create_test_employee(&db, "bob").await?;
        let carol = create_test_employee(&db, "carol").await?;
        let engagement =
            create_test_engagement(&db, "Red Team", date(2024, 1, 1), date(2024, 1, 10)).await?;
        let notifier = RecordingDispatcher::default();

        let first =
            set_engagement_employees(&db, &notifier, engagement.id, &[alice.id, bob.id]).await?;
        assert_eq!(first.added.len(), 2);
        assert!(first.removed.is_empty());
        assert_eq!(notifier.take().len(), 2);

        let second =
            set_engagement_employees(&db, &notifier, engagement.id, &[bob.id, carol.id]).await?;
        assert_eq!(second.added[0].id, carol.id);
        assert_eq!(second.removed[0].id, alice.id);

        let sent = notifier.take();
        assert_eq!(sent.len(), 2);
        assert!(matches!(sent[0], Notification::EmployeeAssigned { .. }));
        assert!(matches!(sent[1], Notification::EmployeeRemoved { .. }));

        let team: Vec<i64> = get_engagement_employees(&db, engagement.id)
            .await?
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(team, vec![bob.id, carol.id]);

        // Same set again changes nothing
        let none = set_engagement_employees(&db, &notifier, engagement.id, &[carol.id, bob.id])
            .await?;
        assert!(none.is_empty());
        assert!(notifier.take().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_employee_rolls_back_assignment() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "alice").await?;
        let engagement =
            create_test_engagement(&db, "Red Team", date(2024, 1, 1), date(2024, 1, 10)).await?;
        let notifier = RecordingDispatcher::default();

        let result = set_engagement_employees(&db, &notifier, engagement.id, &[alice.id, 999]).await;
        assert!(matches!(result, Err(Error::EmployeeNotFound { .. })));
        assert!(get_engagement_employees(&db, engagement.id).await?.is_empty());
        assert!(notifier.take().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_assign_and_unassign_single_employee() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "alice").await?;
        let bob = create_test_employee(&db, "bob").await?;
        let engagement =
            create_test_engagement(&db, "Red Team", date(2024, 1, 1), date(2024, 1, 10)).await?;
        let notifier = RecordingDispatcher::default();

        assign_employee(&db, &notifier, engagement.id, alice.id).await?;
        assign_employee(&db, &notifier, engagement.id, bob.id).await?;
        assert_eq!(get_engagement_employees(&db, engagement.id).await?.len(), 2);

        let change = unassign_employee(&db, &notifier, engagement.id, alice.id).await?;
        assert_eq!(change.removed[0].id, alice.id);
        let team = get_engagement_employees(&db, engagement.id).await?;
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].id, bob.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_by_phase() -> Result<()> {
        let db = setup_test_db().await?;
        let past = create_test_engagement(&db, "Past", date(2024, 1, 1), date(2024, 1, 5)).await?;
        let now = create_test_engagement(&db, "Now", date(2024, 1, 8), date(2024, 1, 12)).await?;
        let later = create_test_engagement(&db, "Later", date(2024, 2, 1), date(2024, 2, 5)).await?;
        let today = date(2024, 1, 10);

        let ids = |list: Vec<engagement::Model>| list.iter().map(|e| e.id).collect::<Vec<_>>();
        assert_eq!(ids(list_by_phase(&db, EngagementPhase::Completed, today).await?), vec![past.id]);
        assert_eq!(ids(list_by_phase(&db, EngagementPhase::Ongoing, today).await?), vec![now.id]);
        assert_eq!(ids(list_by_phase(&db, EngagementPhase::Upcoming, today).await?), vec![later.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_engagement_summary_loads_team_and_findings() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_employee(&db, "alice").await?;
        let engagement =
            create_test_engagement(&db, "Red Team", date(2024, 1, 1), date(2024, 1, 4)).await?;
        assign_test_employee(&db, engagement.id, alice.id).await?;
        create_test_vulnerability(&db, engagement.id, Severity::High).await?;

        let summary =
            engagement_summary(&db, engagement, &Settings::default(), date(2024, 1, 2)).await?;
        assert_eq!(summary.team_size, 1);
        assert_eq!(summary.estimated_cost, 4000);
        assert_eq!(summary.risk_score, 7);
        Ok(())
    }
}
