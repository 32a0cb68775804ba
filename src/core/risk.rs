//! Risk and priority scoring.
//!
//! Two separate scales live here. The risk scale weighs open findings by severity and is
//! bucketed at 50 / 20 / 0. The priority scale ranks engagements for attention and is
//! bucketed at 15 / 5. They are not interchangeable.

use crate::entities::vulnerability::{self, Severity, VulnerabilityStatus};
use serde::Serialize;
use std::fmt;

/// Weight of one open finding of the given severity.
#[must_use]
pub const fn severity_weight(severity: Severity) -> i64 {
    match severity {
        Severity::Critical => 10,
        Severity::High => 7,
        Severity::Medium => 4,
        Severity::Low => 1,
    }
}

/// Severity-weighted sum over the open findings; fixed findings are ignored.
#[must_use]
pub fn risk_score(vulnerabilities: &[vulnerability::Model]) -> i64 {
    vulnerabilities
        .iter()
        .filter(|vuln| vuln.status == VulnerabilityStatus::Open)
        .map(|vuln| severity_weight(vuln.severity))
        .sum()
}

/// Client risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// No open findings
    None,
    /// Score above 0
    Low,
    /// Score of 20 or more
    Medium,
    /// Score of 50 or more
    High,
}

impl RiskLevel {
    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buckets a risk score.
#[must_use]
pub const fn risk_level(score: i64) -> RiskLevel {
    if score >= 50 {
        RiskLevel::High
    } else if score >= 20 {
        RiskLevel::Medium
    } else if score > 0 {
        RiskLevel::Low
    } else {
        RiskLevel::None
    }
}

/// Engagement priority bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    /// Score below 5
    Low,
    /// Score of 5 or more
    Medium,
    /// Score of 15 or more
    High,
}

impl PriorityLevel {
    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buckets a priority score.
#[must_use]
pub const fn priority_level(score: i64) -> PriorityLevel {
    if score >= 15 {
        PriorityLevel::High
    } else if score >= 5 {
        PriorityLevel::Medium
    } else {
        PriorityLevel::Low
    }
}
