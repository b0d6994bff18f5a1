//! Weekly-to-daily expansion.
//!
//! Each weekly row becomes up to seven daily rows:
//!
//! 1. candidates are the seven days ending on the clipped Sunday
//! 2. days outside the reported month are dropped
//! 3. days before `sunday_original - 6` are dropped
//! 4. surviving days are counted per `GroupKey` (distinct dates)
//! 5. both quantities are divided by that count
//! 6. days where both quantities are exactly zero are dropped
//!
//! Step 4 needs every row's surviving days before any division happens.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{DailyRecord, GroupKey, ResolvedDates, WeeklyRecord};
use crate::error::CoreError;

/// Counts collected while expanding a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpansionStats {
    pub weekly_rows: usize,
    pub candidate_days: usize,
    pub outside_month: usize,
    pub before_week_start: usize,
    pub zero_rows_dropped: usize,
    pub groups: usize,
    pub daily_rows: usize,
}

/// Output of `expand_to_daily`.
#[derive(Debug, Clone)]
pub struct Expansion {
    pub daily: Vec<DailyRecord>,
    pub stats: ExpansionStats,
}

/// The seven days ending on (and including) the clipped Sunday, oldest first.
pub fn candidate_days(dates: &ResolvedDates) -> [NaiveDate; 7] {
    std::array::from_fn(|j| dates.sunday_clipped - Duration::days(6 - j as i64))
}

/// Candidate days that pass both the month filter and the week-start bound.
pub fn surviving_days(record: &WeeklyRecord, dates: &ResolvedDates) -> Vec<NaiveDate> {
    let lower_bound = dates.sunday_original - Duration::days(6);
    candidate_days(dates)
        .into_iter()
        .filter(|d| in_month(*d, record.month))
        .filter(|d| *d >= lower_bound)
        .collect()
}

/// Expand weekly rows into daily rows. `resolved[i]` must belong to `records[i]`.
pub fn expand_to_daily(records: &[WeeklyRecord], resolved: &[ResolvedDates]) -> Result<Expansion, CoreError> {
    if records.len() != resolved.len() {
        return Err(CoreError::ResolvedMismatch {
            records: records.len(),
            resolved: resolved.len(),
        });
    }

    let mut stats = ExpansionStats {
        weekly_rows: records.len(),
        ..ExpansionStats::default()
    };

    // Filter candidates for every row first; counts depend on all of them.
    let mut kept: Vec<Vec<NaiveDate>> = Vec::with_capacity(records.len());
    for (record, dates) in records.iter().zip(resolved) {
        let lower_bound = dates.sunday_original - Duration::days(6);
        let mut days = Vec::with_capacity(7);
        for day in candidate_days(dates) {
            stats.candidate_days += 1;
            if !in_month(day, record.month) {
                stats.outside_month += 1;
            } else if day < lower_bound {
                stats.before_week_start += 1;
            } else {
                days.push(day);
            }
        }
        kept.push(days);
    }

    let counts = valid_day_counts(records, &kept);
    stats.groups = counts.len();

    let mut daily = Vec::new();
    for (idx, (record, days)) in records.iter().zip(&kept).enumerate() {
        let Some(&count) = counts.get(&record.group_key()) else {
            continue;
        };
        let divisor = count.max(1) as f64;
        let unit_sales = record.unit_sales / divisor;
        let revenue = record.revenue / divisor;

        for &date in days {
            if unit_sales == 0.0 && revenue == 0.0 {
                stats.zero_rows_dropped += 1;
                continue;
            }
            daily.push(DailyRecord {
                source: idx,
                date,
                unit_sales,
                revenue,
            });
        }
    }
    stats.daily_rows = daily.len();

    Ok(Expansion { daily, stats })
}

/// Number of distinct surviving dates per group.
///
/// Groups whose rows lost every candidate day do not appear in the map.
pub fn valid_day_counts(records: &[WeeklyRecord], kept: &[Vec<NaiveDate>]) -> HashMap<GroupKey, usize> {
    let mut dates: HashMap<GroupKey, BTreeSet<NaiveDate>> = HashMap::new();
    for (record, days) in records.iter().zip(kept) {
        if days.is_empty() {
            continue;
        }
        dates.entry(record.group_key()).or_default().extend(days.iter().copied());
    }
    dates.into_iter().map(|(key, set)| (key, set.len())).collect()
}

fn in_month(day: NaiveDate, month: i32) -> bool {
    i64::from(day.month()) == i64::from(month)
}
