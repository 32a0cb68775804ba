//! Client business logic - Client records, activity and risk reporting.

use crate::{
    core::{
        engagement::{EngagementPhase, phase},
        risk::{RiskLevel, risk_level, risk_score},
        vulnerability::get_vulnerabilities_for_client,
    },
    entities::{
        Client, Engagement, client, engagement,
        vulnerability::{self, Severity, VulnerabilityStatus},
    },
    errors::{Error, Result},
};
use chrono::{Duration, NaiveDate};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use std::fmt;

/// Window used to decide whether a client is still moderately active
pub const RECENT_ACTIVITY_DAYS: i64 = 90;

/// How busy we are with a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// At least one engagement in progress
    High,
    /// Nothing in progress, but an engagement ended recently or is scheduled
    Medium,
    /// Nothing recent
    Low,
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        })
    }
}

/// Activity level of a client from its engagements.
///
/// An engagement counts as recent when its last day is no more than
/// [`RECENT_ACTIVITY_DAYS`] days before `today`.
#[must_use]
pub fn activity_level(engagements: &[engagement::Model], today: NaiveDate) -> ActivityLevel {
    if engagements
        .iter()
        .any(|eng| phase(eng, today) == EngagementPhase::Ongoing)
    {
        return ActivityLevel::High;
    }
    let cutoff = today - Duration::days(RECENT_ACTIVITY_DAYS);
    if engagements.iter().any(|eng| eng.end_date >= cutoff) {
        ActivityLevel::Medium
    } else {
        ActivityLevel::Low
    }
}

/// Client report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    /// The client
    pub client: client::Model,
    /// Activity bucket
    pub activity: ActivityLevel,
    /// Engagements in progress
    pub current_engagements: usize,
    /// All engagements ever
    pub total_engagements: usize,
    /// Most recent last day among the engagements
    pub last_engagement_end: Option<NaiveDate>,
    /// Open findings across engagements
    pub open_vulnerabilities: usize,
    /// Open critical findings
    pub critical_vulnerabilities: usize,
    /// Severity-weighted open findings
    pub risk_score: i64,
    /// Bucketed risk
    pub risk_level: RiskLevel,
}

/// Builds the summary from already loaded data.
#[must_use]
pub fn summarize_client(
    client: client::Model,
    engagements: &[engagement::Model],
    vulnerabilities: &[vulnerability::Model],
    today: NaiveDate,
) -> ClientSummary {
    let open: Vec<&vulnerability::Model> = vulnerabilities
        .iter()
        .filter(|vuln| vuln.status == VulnerabilityStatus::Open)
        .collect();
    let score = risk_score(vulnerabilities);

    ClientSummary {
        client,
        activity: activity_level(engagements, today),
        current_engagements: engagements
            .iter()
            .filter(|eng| phase(eng, today) == EngagementPhase::Ongoing)
            .count(),
        total_engagements: engagements.len(),
        last_engagement_end: engagements.iter().map(|eng| eng.end_date).max(),
        open_vulnerabilities: open.len(),
        critical_vulnerabilities: open
            .iter()
            .filter(|vuln| vuln.severity == Severity::Critical)
            .count(),
        risk_score: score,
        risk_level: risk_level(score),
    }
}

/// Loads a client's engagements and findings and summarizes them.
pub async fn client_summary(
    db: &DatabaseConnection,
    client: client::Model,
    today: NaiveDate,
) -> Result<ClientSummary> {
    let engagements = get_client_engagements(db, client.id).await?;
    let vulnerabilities = get_vulnerabilities_for_client(db, client.id).await?;
    Ok(summarize_client(client, &engagements, &vulnerabilities, today))
}

/// Risk score over the open findings of all the client's engagements.
pub async fn client_risk_score(db: &DatabaseConnection, client_id: i64) -> Result<i64> {
    let vulnerabilities = get_vulnerabilities_for_client(db, client_id).await?;
    Ok(risk_score(&vulnerabilities))
}

/// Creates a client after validating its name.
pub async fn create_client(
    db: &DatabaseConnection,
    name: &str,
    acronym: &str,
    code: &str,
) -> Result<client::Model> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Client name cannot be empty".to_string(),
        });
    }
    if find_client(db, name).await?.is_some() {
        return Err(Error::InvalidInput {
            message: format!("Client '{}' already exists", name.trim()),
        });
    }

    let client = client::ActiveModel {
        name: Set(name.trim().to_string()),
        acronym: Set(acronym.trim().to_uppercase()),
        code: Set(code.trim().to_string()),
        ..Default::default()
    };
    client.insert(db).await.map_err(Into::into)
}

/// Finds a client by name or acronym.
pub async fn find_client(db: &DatabaseConnection, name: &str) -> Result<Option<client::Model>> {
    let name = name.trim();
    Client::find()
        .filter(
            client::Column::Name
                .eq(name)
                .or(client::Column::Acronym.eq(name.to_uppercase())),
        )
        .order_by_asc(client::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every client ordered by name.
pub async fn get_all_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>> {
    Client::find()
        .order_by_asc(client::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Engagements of a client, latest start first.
pub async fn get_client_engagements(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Vec<engagement::Model>> {
    Engagement::find()
        .filter(engagement::Column::ClientId.eq(client_id))
        .order_by_desc(engagement::Column::StartDate)
        .all(db)
        .await
        .map_err(Into::into)
}
