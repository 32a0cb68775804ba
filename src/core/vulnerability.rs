//! Vulnerability business logic - Findings, remediation and SLA tracking.
//!
//! A finding is overdue once it has stayed open for more whole days than the SLA of its
//! severity allows. Windows come from [`SlaSettings`], never from constants.

use crate::{
    config::settings::SlaSettings,
    entities::{
        Engagement, Vulnerability, engagement,
        vulnerability::{self, Severity, VulnerabilityStatus},
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

/// Whole days between the finding being recorded and `today`.
#[must_use]
pub fn days_open(vulnerability: &vulnerability::Model, today: NaiveDate) -> i64 {
    (today - vulnerability.created_at.date_naive()).num_days()
}

/// Open and past the SLA window of its severity.
#[must_use]
pub fn is_overdue(vulnerability: &vulnerability::Model, today: NaiveDate, sla: &SlaSettings) -> bool {
    vulnerability.status == VulnerabilityStatus::Open
        && days_open(vulnerability, today) > sla.days_for(vulnerability.severity)
}

/// SLA standing of one finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlaInfo {
    /// Window for the finding's severity
    pub sla_days: i64,
    /// Days open; for a fixed finding, days until it was fixed
    pub days_open: i64,
    /// See [`is_overdue`]
    pub is_overdue: bool,
    /// Days left before the window closes; 0 once fixed or exceeded
    pub days_until_sla: i64,
}

/// SLA details of a finding on `today`.
#[must_use]
pub fn sla_info(vulnerability: &vulnerability::Model, today: NaiveDate, sla: &SlaSettings) -> SlaInfo {
    let sla_days = sla.days_for(vulnerability.severity);
    let open_until = match (vulnerability.status, vulnerability.fixed_at) {
        (VulnerabilityStatus::Fixed, Some(fixed_at)) => fixed_at.date_naive(),
        _ => today,
    };
    let days_open = days_open(vulnerability, open_until);
    let days_until_sla = if vulnerability.status == VulnerabilityStatus::Open {
        (sla_days - days_open).max(0)
    } else {
        0
    };

    SlaInfo {
        sla_days,
        days_open,
        is_overdue: is_overdue(vulnerability, today, sla),
        days_until_sla,
    }
}

/// Records a new open finding on an engagement.
#[instrument(skip(db))]
pub async fn create_vulnerability(
    db: &DatabaseConnection,
    engagement_id: i64,
    title: &str,
    severity: Severity,
    created_by: Option<i64>,
) -> Result<vulnerability::Model> {
    if title.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Vulnerability title cannot be empty".to_string(),
        });
    }
    if Engagement::find_by_id(engagement_id).one(db).await?.is_none() {
        return Err(Error::EngagementNotFound {
            name: engagement_id.to_string(),
        });
    }

    let vulnerability = vulnerability::ActiveModel {
        engagement_id: Set(engagement_id),
        title: Set(title.trim().to_string()),
        severity: Set(severity),
        status: Set(VulnerabilityStatus::Open),
        created_at: Set(Utc::now()),
        fixed_at: Set(None),
        created_by: Set(created_by),
        fixed_by: Set(None),
        ..Default::default()
    };
    vulnerability.insert(db).await.map_err(Into::into)
}

/// Marks a finding fixed, recording who fixed it and when.
#[instrument(skip(db))]
pub async fn mark_fixed(
    db: &DatabaseConnection,
    vulnerability_id: i64,
    fixed_by: Option<i64>,
) -> Result<vulnerability::Model> {
    let vulnerability = Vulnerability::find_by_id(vulnerability_id)
        .one(db)
        .await?
        .ok_or(Error::VulnerabilityNotFound {
            id: vulnerability_id,
        })?;
    if vulnerability.status == VulnerabilityStatus::Fixed {
        return Ok(vulnerability);
    }

    let mut active_model: vulnerability::ActiveModel = vulnerability.into();
    active_model.status = Set(VulnerabilityStatus::Fixed);
    active_model.fixed_at = Set(Some(Utc::now()));
    active_model.fixed_by = Set(fixed_by);
    let updated = active_model.update(db).await?;
    info!("Vulnerability {} marked fixed", updated.id);
    Ok(updated)
}

/// Findings of one engagement, most severe first.
pub async fn get_vulnerabilities_for_engagement(
    db: &DatabaseConnection,
    engagement_id: i64,
) -> Result<Vec<vulnerability::Model>> {
    let mut found = Vulnerability::find()
        .filter(vulnerability::Column::EngagementId.eq(engagement_id))
        .order_by_asc(vulnerability::Column::Id)
        .all(db)
        .await?;
    found.sort_by(|a, b| b.severity.cmp(&a.severity));
    Ok(found)
}

/// Findings across every engagement of a client.
pub async fn get_vulnerabilities_for_client(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Vec<vulnerability::Model>> {
    Vulnerability::find()
        .inner_join(Engagement)
        .filter(engagement::Column::ClientId.eq(client_id))
        .order_by_asc(vulnerability::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every overdue finding on `today`, oldest first.
pub async fn list_overdue(
    db: &DatabaseConnection,
    sla: &SlaSettings,
    today: NaiveDate,
) -> Result<Vec<vulnerability::Model>> {
    let open = Vulnerability::find()
        .filter(vulnerability::Column::Status.eq(VulnerabilityStatus::Open))
        .order_by_asc(vulnerability::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(open
        .into_iter()
        .filter(|vuln| is_overdue(vuln, today, sla))
        .collect())
}
