//! Application settings loaded from `config.toml`.
//!
//! [`Settings`] is built once at start-up and passed explicitly to every calculation that
//! depends on it (SLA windows, utilization thresholds, cost per day). Every table in the
//! file is optional; anything left out falls back to the defaults below.
//!
//! ```toml
//! cost_per_day = 1000
//! alert_engagement_days = 3
//!
//! [sla]
//! critical = 7
//! high = 30
//! medium = 90
//! low = 180
//!
//! [utilization]
//! window_days = 30
//! high_threshold = 80.0
//! medium_threshold = 40.0
//!
//! [notifications]
//! channel_id = 123456789012345678
//!
//! [[services]]
//! name = "Penetration Test"
//! short_name = "PT"
//! ```

use crate::entities::vulnerability::Severity;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Longest accepted utilization window, about ten years
pub const MAX_WINDOW_DAYS: u32 = 3660;

/// Root of `config.toml`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cost of one utilized consultant day
    pub cost_per_day: u64,
    /// Days ahead of an engagement start at which assignees are alerted
    pub alert_engagement_days: i64,
    /// Per-severity remediation windows
    pub sla: SlaSettings,
    /// Utilization window and bucket thresholds
    pub utilization: UtilizationSettings,
    /// Where notifications are delivered
    pub notifications: NotificationSettings,
    /// Service catalogue seeded on start-up
    pub services: Vec<ServiceConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cost_per_day: 1000,
            alert_engagement_days: 3,
            sla: SlaSettings::default(),
            utilization: UtilizationSettings::default(),
            notifications: NotificationSettings::default(),
            services: Vec::new(),
        }
    }
}

/// Maximum number of days a finding may stay open, by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SlaSettings {
    /// Window for critical findings
    pub critical: i64,
    /// Window for high findings
    pub high: i64,
    /// Window for medium findings
    pub medium: i64,
    /// Window for low findings
    pub low: i64,
}

impl Default for SlaSettings {
    fn default() -> Self {
        Self {
            critical: 7,
            high: 30,
            medium: 90,
            low: 180,
        }
    }
}

impl SlaSettings {
    /// SLA window in days for the given severity.
    #[must_use]
    pub const fn days_for(&self, severity: Severity) -> i64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// Utilization reporting settings
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct UtilizationSettings {
    /// Length of the trailing window used for per-employee utilization
    pub window_days: u32,
    /// Rates at or above this are bucketed as high
    pub high_threshold: f64,
    /// Rates at or above this (and below high) are bucketed as medium
    pub medium_threshold: f64,
}

impl Default for UtilizationSettings {
    fn default() -> Self {
        Self {
            window_days: 30,
            high_threshold: 80.0,
            medium_threshold: 40.0,
        }
    }
}

/// Notification delivery settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Discord channel receiving notifications; unset means log only
    pub channel_id: Option<u64>,
}

/// One entry of the service catalogue
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,
    /// Abbreviation
    pub short_name: String,
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML is invalid,
/// or a value fails validation (negative SLA window, inverted thresholds).
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load settings from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_settings(&contents)
}

/// Loads settings from the file named by `STAFFING_CONFIG` (default `./config.toml`).
/// A missing file yields the defaults.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("STAFFING_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        load_settings(&path)
    } else {
        tracing::warn!("No settings file at {path}, using defaults");
        Ok(Settings::default())
    }
}

/// Parses and validates settings from TOML text.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.validate()?;
    Ok(settings)
}

impl Settings {
    fn validate(&self) -> Result<()> {
        let sla = &self.sla;
        if [sla.critical, sla.high, sla.medium, sla.low]
            .iter()
            .any(|days| *days < 0)
        {
            return Err(Error::Config {
                message: "SLA windows must not be negative".to_string(),
            });
        }
        if !(1..=MAX_WINDOW_DAYS).contains(&self.utilization.window_days) {
            return Err(Error::Config {
                message: format!(
                    "utilization.window_days must be between 1 and {MAX_WINDOW_DAYS}"
                ),
            });
        }
        if self.utilization.medium_threshold > self.utilization.high_threshold {
            return Err(Error::Config {
                message: "utilization.medium_threshold must not exceed high_threshold"
                    .to_string(),
            });
        }
        if self.alert_engagement_days < 0 {
            return Err(Error::Config {
                message: "alert_engagement_days must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings.cost_per_day, 1000);
        assert_eq!(settings.sla, SlaSettings::default());
        assert_eq!(settings.utilization.window_days, 30);
        assert!(settings.notifications.channel_id.is_none());
        assert!(settings.services.is_empty());
    }

    #[test]
    fn test_window_days_out_of_range_is_rejected() {
        let too_long = parse_settings("[utilization]\nwindow_days = 4000000000\n");
        assert!(matches!(too_long, Err(Error::Config { .. })));
        let empty = parse_settings("[utilization]\nwindow_days = 0\n");
        assert!(matches!(empty, Err(Error::Config { .. })));
        assert!(parse_settings(&format!("[utilization]\nwindow_days = {MAX_WINDOW_DAYS}\n")).is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            cost_per_day = 1500
            alert_engagement_days = 5

            [sla]
            critical = 3
            high = 14

            [utilization]
            window_days = 60
            high_threshold = 90.0
            medium_threshold = 50.0

            [notifications]
            channel_id = 42

            [[services]]
            name = "Penetration Test"
            short_name = "PT"

            [[services]]
            name = "Code Review"
            short_name = "CR"
        "#;

        let settings = parse_settings(toml_str).unwrap();
        assert_eq!(settings.cost_per_day, 1500);
        assert_eq!(settings.alert_engagement_days, 5);
        assert_eq!(settings.sla.critical, 3);
        assert_eq!(settings.sla.high, 14);
        // Unspecified keys keep their defaults
        assert_eq!(settings.sla.medium, 90);
        assert_eq!(settings.sla.low, 180);
        assert_eq!(settings.utilization.window_days, 60);
        assert_eq!(settings.utilization.high_threshold, 90.0);
        assert_eq!(settings.notifications.channel_id, Some(42));
        assert_eq!(settings.services.len(), 2);
        assert_eq!(settings.services[1].short_name, "CR");
    }

    #[test]
    fn test_sla_days_for_severity() {
        let sla = SlaSettings::default();
        assert_eq!(sla.days_for(Severity::Critical), 7);
        assert_eq!(sla.days_for(Severity::High), 30);
        assert_eq!(sla.days_for(Severity::Medium), 90);
        assert_eq!(sla.days_for(Severity::Low), 180);
    }

    #[test]
    fn test_rejects_negative_sla() {
        let result = parse_settings("[sla]\ncritical = -1\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let result =
            parse_settings("[utilization]\nhigh_threshold = 30.0\nmedium_threshold = 60.0\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_rejects_invalid_toml() {
        let result = parse_settings("cost_per_day = \"lots\"");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
