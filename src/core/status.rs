//! Status resolver - What an employee is doing on a given day, and what comes next.
//!
//! Leaves are checked before engagements: someone on vacation while still assigned to an
//! engagement is reported as on vacation. Within each kind the first record in creation
//! order wins when several cover the same day.

use crate::{
    core::{dates::DATE_FORMAT, employee::EmployeeSchedule},
    entities::leave::LeaveType,
};
use chrono::NaiveDate;
use serde::Serialize;

/// Current state of an employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusKind {
    /// No commitment today
    Available,
    /// Working on an engagement
    Engaged,
    /// On a training leave
    Training,
    /// On vacation
    Vacation,
    /// Working from home
    WorkFromHome,
}

impl StatusKind {
    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Engaged => "Engaged",
            Self::Training => "Training",
            Self::Vacation => "Vacation",
            Self::WorkFromHome => "Work from home",
        }
    }

    /// Status emoji used in chat replies
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Available => "✅",
            Self::Engaged => "🔧",
            Self::Training => "📚",
            Self::Vacation => "🏖️",
            Self::WorkFromHome => "🏠",
        }
    }
}

impl From<LeaveType> for StatusKind {
    fn from(value: LeaveType) -> Self {
        match value {
            LeaveType::Training => Self::Training,
            LeaveType::Vacation => Self::Vacation,
            LeaveType::WorkFromHome => Self::WorkFromHome,
        }
    }
}

/// Resolved status of an employee on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeStatus {
    /// Which state applies
    #[serde(rename = "type")]
    pub kind: StatusKind,
    /// Label with the detail of the matching record (e.g., `"Vacation: Hajj"`)
    pub label: String,
    /// Last day of the matching record; `None` when available
    pub until: Option<NaiveDate>,
}

/// Resolves the employee's status on `today`.
#[must_use]
pub fn current_status(schedule: &EmployeeSchedule, today: NaiveDate) -> EmployeeStatus {
    if let Some(leave) = schedule
        .leaves
        .iter()
        .find(|lev| lev.start_date <= today && today <= lev.end_date)
    {
        let kind = StatusKind::from(leave.leave_type);
        let label = if leave.note.trim().is_empty() {
            kind.label().to_string()
        } else {
            format!("{}: {}", kind.label(), leave.note)
        };
        return EmployeeStatus {
            kind,
            label,
            until: Some(leave.end_date),
        };
    }

    if let Some(engagement) = schedule
        .engagements
        .iter()
        .find(|eng| eng.start_date <= today && today <= eng.end_date)
    {
        return EmployeeStatus {
            kind: StatusKind::Engaged,
            label: format!("Engaged: {}", engagement.name),
            until: Some(engagement.end_date),
        };
    }

    EmployeeStatus {
        kind: StatusKind::Available,
        label: StatusKind::Available.label().to_string(),
        until: None,
    }
}

/// The next commitment starting strictly after today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NextEvent {
    /// An engagement the employee is assigned to
    Engagement {
        /// Engagement id
        id: i64,
        /// Engagement name
        name: String,
        /// First day
        start_date: NaiveDate,
    },
    /// One of the employee's leaves
    Leave {
        /// Leave id
        id: i64,
        /// Kind of leave
        leave_type: LeaveType,
        /// Leave note
        note: String,
        /// First day
        start_date: NaiveDate,
    },
    /// Nothing scheduled
    None,
}

impl NextEvent {
    /// Short description for display
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Engagement { name, .. } => name.clone(),
            Self::Leave {
                leave_type, note, ..
            } => {
                if note.trim().is_empty() {
                    leave_type.label().to_string()
                } else {
                    format!("{} -- {note}", leave_type.label())
                }
            }
            Self::None => "No upcoming event".to_string(),
        }
    }

    /// First day of the event, if there is one
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Engagement { start_date, .. } | Self::Leave { start_date, .. } => {
                Some(*start_date)
            }
            Self::None => None,
        }
    }
}

/// Finds the employee's earliest engagement or leave starting after `today`.
///
/// When an engagement and a leave start on the same day the engagement is returned.
#[must_use]
pub fn next_event(schedule: &EmployeeSchedule, today: NaiveDate) -> NextEvent {
    let engagement = schedule
        .engagements
        .iter()
        .filter(|eng| eng.start_date > today)
        .min_by_key(|eng| (eng.start_date, eng.id));
    let leave = schedule
        .leaves
        .iter()
        .filter(|lev| lev.start_date > today)
        .min_by_key(|lev| (lev.start_date, lev.id));

    let engagement_event = |eng: &crate::entities::engagement::Model| NextEvent::Engagement {
        id: eng.id,
        name: eng.name.clone(),
        start_date: eng.start_date,
    };
    let leave_event = |lev: &crate::entities::leave::Model| NextEvent::Leave {
        id: lev.id,
        leave_type: lev.leave_type,
        note: lev.note.clone(),
        start_date: lev.start_date,
    };

    match (engagement, leave) {
        (Some(eng), Some(lev)) if lev.start_date < eng.start_date => leave_event(lev),
        (Some(eng), _) => engagement_event(eng),
        (None, Some(lev)) => leave_event(lev),
        (None, None) => NextEvent::None,
    }
}

/// An assigned engagement about to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingAlert {
    /// Engagement id
    pub engagement_id: i64,
    /// Engagement name
    pub name: String,
    /// First day
    pub start_date: NaiveDate,
    /// Days from today until the start (at least 1)
    pub days_until_start: i64,
}

/// Engagements of the employee starting within `horizon_days` after today, soonest first.
#[must_use]
pub fn upcoming_alerts(
    schedule: &EmployeeSchedule,
    today: NaiveDate,
    horizon_days: i64,
) -> Vec<UpcomingAlert> {
    let mut alerts: Vec<UpcomingAlert> = schedule
        .engagements
        .iter()
        .filter(|eng| eng.start_date > today)
        .map(|eng| UpcomingAlert {
            engagement_id: eng.id,
            name: eng.name.clone(),
            start_date: eng.start_date,
            days_until_start: (eng.start_date - today).num_days(),
        })
        .filter(|alert| alert.days_until_start <= horizon_days)
        .collect();
    alerts.sort_by_key(|alert| (alert.start_date, alert.engagement_id));
    alerts
}

/// One-line summary such as `"Engaged: Web App Test (until 2024-01-10)"`.
#[must_use]
pub fn format_status(status: &EmployeeStatus) -> String {
    status.until.map_or_else(
        || format!("{} {}", status.kind.icon(), status.label),
        |until| {
            format!(
                "{} {} (until {})",
                status.kind.icon(),
                status.label,
                until.format(DATE_FORMAT)
            )
        },
    )
}
