//! Utilization reporting.
//!
//! Utilization is the inverse of availability: the share of days in a window on which an
//! employee has any commitment. Team figures average the individual ones; an empty team
//! or an empty window reports 0%.

use crate::{
    config::settings::UtilizationSettings,
    core::{
        availability::{availability, has_conflict},
        dates::DateRange,
        employee::EmployeeSchedule,
    },
};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// Utilization of one employee over the `window_days` days ending on `today` (inclusive),
/// as a percentage rounded to two decimals.
///
/// A window reaching before the first representable date reports 0%.
#[must_use]
pub fn utilization_rate(schedule: &EmployeeSchedule, window_days: u32, today: NaiveDate) -> f64 {
    if window_days == 0 {
        return 0.0;
    }
    let Some(start) = today.checked_sub_signed(Duration::days(i64::from(window_days) - 1)) else {
        return 0.0;
    };
    let result = availability(schedule, start, today);
    if result.total_days == 0 {
        return 0.0;
    }

    // Cast safety: day counts are far below 2^52
    #[allow(clippy::cast_precision_loss)]
    let rate = result.busy_days as f64 / result.total_days as f64 * 100.0;
    round2(rate)
}

/// Mean of per-employee rates; 0 for an empty team.
#[must_use]
pub fn team_utilization(rates: &[f64]) -> f64 {
    if rates.is_empty() {
        return 0.0;
    }
    // Cast safety: team sizes are small
    #[allow(clippy::cast_precision_loss)]
    let mean = rates.iter().sum::<f64>() / rates.len() as f64;
    round2(mean)
}

/// High / medium / low utilization bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationBucket {
    /// At or above the high threshold
    High,
    /// At or above the medium threshold
    Medium,
    /// Below the medium threshold
    Low,
}

/// Buckets a utilization rate using the configured thresholds.
#[must_use]
pub fn utilization_bucket(rate: f64, settings: &UtilizationSettings) -> UtilizationBucket {
    if rate >= settings.high_threshold {
        UtilizationBucket::High
    } else if rate >= settings.medium_threshold {
        UtilizationBucket::Medium
    } else {
        UtilizationBucket::Low
    }
}

/// Share of busy employees on each day of `range`, averaged over the days.
///
/// Only employees who had joined by a given day count towards that day. A day with no
/// eligible employees contributes 0.
#[must_use]
pub fn team_utilization_for_period(schedules: &[EmployeeSchedule], range: DateRange) -> f64 {
    let mut total = 0.0;
    let mut days = 0_u32;

    for day in range.days() {
        days += 1;
        let eligible: Vec<&EmployeeSchedule> = schedules
            .iter()
            .filter(|schedule| schedule.employee.date_joined <= day)
            .collect();
        if eligible.is_empty() {
            continue;
        }
        let busy = eligible
            .iter()
            .filter(|schedule| has_conflict(schedule, day, day))
            .count();
        // Cast safety: team sizes are small
        #[allow(clippy::cast_precision_loss)]
        let share = busy as f64 / eligible.len() as f64;
        total += share;
    }

    if days == 0 {
        return 0.0;
    }
    round2(total / f64::from(days) * 100.0)
}

/// Team utilization for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyUtilization {
    /// Month number, 1-12
    pub month: u32,
    /// Percentage, two decimals
    pub rate: f64,
}

impl MonthlyUtilization {
    /// English month name, or `"?"` when `month` is out of range.
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|number| chrono::Month::try_from(number).ok())
            .map_or("?", |month| month.name())
    }
}

/// Team utilization for each month of `year`.
#[must_use]
pub fn monthly_team_utilization(schedules: &[EmployeeSchedule], year: i32) -> Vec<MonthlyUtilization> {
    (1..=12)
        .filter_map(|month| {
            let range = month_range(year, month)?;
            Some(MonthlyUtilization {
                month,
                rate: team_utilization_for_period(schedules, range),
            })
        })
        .collect()
}

/// First and last day of a calendar month.
#[must_use]
pub fn month_range(year: i32, month: u32) -> Option<DateRange> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = next_first.pred_opt()?;
    debug_assert_eq!(last.month(), month);
    DateRange::new(first, last).ok()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
