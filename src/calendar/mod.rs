//! ISO week to week-ending Sunday resolution.
//!
//! Week 1 of an ISO year is the Monday-to-Sunday week holding January 4th. From that
//! Monday, week `n` ends on `monday + (n - 1) weeks + 6 days`. The resulting Sunday is
//! then clipped to the last day of the month the row is reported against.
//!
//! The week number is not validated here: week 0, negative weeks, or weeks past 53
//! still resolve to some Sunday, whose days the expander's month filter throws away.
//! Use `validate_iso_week` when such rows should be rejected instead.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rayon::prelude::*;

use crate::domain::{ResolvedDates, WeeklyRecord};
use crate::error::{CalendarError, CoreError};

/// Monday of ISO week 1 of `year`.
pub fn iso_week_one_monday(year: i32) -> Option<NaiveDate> {
    let jan4 = NaiveDate::from_ymd_opt(year, 1, 4)?;
    let offset = i64::from(jan4.weekday().num_days_from_monday());
    jan4.checked_sub_signed(Duration::days(offset))
}

/// Last calendar day of `month` in `year`.
pub fn month_last_day(year: i32, month: i32) -> Result<NaiveDate, CalendarError> {
    validate_month(month)?;
    let last = if month == 12 {
        NaiveDate::from_ymd_opt(year, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(year, month as u32 + 1, 1).and_then(|first| first.pred_opt())
    };
    last.ok_or(CalendarError::YearOutOfRange(year))
}

/// Resolve the clipped and unclipped week-ending Sundays of one row.
pub fn resolve_sunday(week: i32, year: i32, month: i32) -> Result<ResolvedDates, CalendarError> {
    let month_end = month_last_day(year, month)?;
    let monday = iso_week_one_monday(year).ok_or(CalendarError::YearOutOfRange(year))?;

    let sunday_original = monday
        .checked_add_signed(Duration::weeks(i64::from(week) - 1) + Duration::days(6))
        .ok_or(CalendarError::DateOutOfRange { week, year })?;

    Ok(ResolvedDates {
        sunday_clipped: sunday_original.min(month_end),
        sunday_original,
    })
}

/// Resolve parallel `week`/`year`/`month` sequences.
///
/// A failure is reported as `InvalidCalendarInput` with `line` set to the 1-based
/// position of the first failing entry.
pub fn resolve_all(weeks: &[i32], years: &[i32], months: &[i32]) -> Result<Vec<ResolvedDates>, CoreError> {
    if weeks.len() != years.len() || weeks.len() != months.len() {
        return Err(CoreError::LengthMismatch {
            weeks: weeks.len(),
            years: years.len(),
            months: months.len(),
        });
    }

    let results: Vec<_> = weeks
        .par_iter()
        .zip(years.par_iter())
        .zip(months.par_iter())
        .map(|((&week, &year), &month)| resolve_sunday(week, year, month))
        .collect();

    collect_resolved(results, |idx| idx + 1)
}

/// Resolve every record of a weekly table, reporting failures by CSV line.
pub fn resolve_records(records: &[WeeklyRecord]) -> Result<Vec<ResolvedDates>, CoreError> {
    let results: Vec<_> = records
        .par_iter()
        .map(|r| resolve_sunday(r.week, r.year, r.month))
        .collect();

    collect_resolved(results, |idx| records[idx].line)
}

fn collect_resolved(
    results: Vec<Result<ResolvedDates, CalendarError>>,
    line_of: impl Fn(usize) -> usize,
) -> Result<Vec<ResolvedDates>, CoreError> {
    results
        .into_iter()
        .enumerate()
        .map(|(idx, r)| {
            r.map_err(|source| CoreError::InvalidCalendarInput {
                line: line_of(idx),
                source,
            })
        })
        .collect()
}

/// Check that (`year`, `week`) names a real ISO week. Week 53 only exists in long years.
pub fn validate_iso_week(year: i32, week: i32) -> Result<(), CalendarError> {
    iso_week_one_monday(year).ok_or(CalendarError::YearOutOfRange(year))?;
    u32::try_from(week)
        .ok()
        .and_then(|w| NaiveDate::from_isoywd_opt(year, w, Weekday::Sun))
        .map(|_| ())
        .ok_or(CalendarError::WeekOutOfRange { week, year })
}

pub fn validate_month(month: i32) -> Result<(), CalendarError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(CalendarError::MonthOutOfRange(month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_one_monday_steps_back_from_jan_4() {
        // 2020-01-04 is a Saturday, 2021-01-04 a Monday.
        assert_eq!(iso_week_one_monday(2020), Some(ymd(2019, 12, 30)));
        assert_eq!(iso_week_one_monday(2021), Some(ymd(2021, 1, 4)));
        assert_eq!(iso_week_one_monday(2024), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn month_last_day_handles_december_and_leap_years() {
        assert_eq!(month_last_day(2024, 2), Ok(ymd(2024, 2, 29)));
        assert_eq!(month_last_day(2023, 2), Ok(ymd(2023, 2, 28)));
        assert_eq!(month_last_day(2024, 12), Ok(ymd(2024, 12, 31)));
        assert_eq!(month_last_day(2024, 4), Ok(ymd(2024, 4, 30)));
        assert_eq!(month_last_day(2024, 13), Err(CalendarError::MonthOutOfRange(13)));
        assert_eq!(month_last_day(2024, 0), Err(CalendarError::MonthOutOfRange(0)));
    }

    #[test]
    fn week_inside_month_is_not_clipped() {
        let r = resolve_sunday(4, 2024, 1).unwrap();
        assert_eq!(r.sunday_original, ymd(2024, 1, 28));
        assert_eq!(r.sunday_clipped, r.sunday_original);
    }

    #[test]
    fn week_overflowing_month_is_clipped_to_month_end() {
        // ISO week 5 of 2024 runs 2024-01-29 .. 2024-02-04.
        let jan = resolve_sunday(5, 2024, 1).unwrap();
        assert_eq!(jan.sunday_original, ymd(2024, 2, 4));
        assert_eq!(jan.sunday_clipped, ymd(2024, 1, 31));

        let feb = resolve_sunday(5, 2024, 2).unwrap();
        assert_eq!(feb.sunday_clipped, ymd(2024, 2, 4));
    }

    #[test]
    fn week_53_crosses_into_next_year() {
        let r = resolve_sunday(53, 2020, 12).unwrap();
        assert_eq!(r.sunday_original, ymd(2021, 1, 3));
        assert_eq!(r.sunday_clipped, ymd(2020, 12, 31));
    }

    #[test]
    fn out_of_range_week_still_resolves() {
        let r = resolve_sunday(0, 2024, 1).unwrap();
        assert_eq!(r.sunday_original, ymd(2023, 12, 31));
        // Already before the end of January, so no clipping applies.
        assert_eq!(r.sunday_clipped, ymd(2023, 12, 31));
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        assert_eq!(resolve_sunday(5, 2024, 13), Err(CalendarError::MonthOutOfRange(13)));
    }

    #[test]
    fn arithmetic_matches_chrono_iso_weeks() {
        for year in 1995..=2045 {
            let mut previous: Option<NaiveDate> = None;
            for week in 1..=53 {
                let Some(expected) = NaiveDate::from_isoywd_opt(year, week as u32, Weekday::Sun) else {
                    assert!(validate_iso_week(year, week).is_err());
                    continue;
                };
                let r = resolve_sunday(week, year, 1).unwrap();
                assert_eq!(r.sunday_original, expected, "{year}-W{week}");
                assert_eq!(r.sunday_original.weekday(), Weekday::Sun);
                assert!(r.sunday_clipped <= month_last_day(year, 1).unwrap());
                if let Some(prev) = previous {
                    assert_eq!((r.sunday_original - prev).num_days(), 7);
                }
                previous = Some(r.sunday_original);
            }
        }
    }

    #[test]
    fn clipped_never_exceeds_month_end() {
        for month in 1..=12 {
            for week in 1..=52 {
                let r = resolve_sunday(week, 2023, month).unwrap();
                let end = month_last_day(2023, month).unwrap();
                assert!(r.sunday_clipped <= end);
                if r.sunday_original <= end {
                    assert_eq!(r.sunday_clipped, r.sunday_original);
                }
            }
        }
    }

    #[test]
    fn iso_week_validation_knows_long_years() {
        assert!(validate_iso_week(2020, 53).is_ok());
        assert!(validate_iso_week(2026, 53).is_ok());
        assert_eq!(
            validate_iso_week(2025, 53),
            Err(CalendarError::WeekOutOfRange { week: 53, year: 2025 })
        );
        assert!(validate_iso_week(2024, 0).is_err());
        assert!(validate_iso_week(2024, -3).is_err());
    }

    #[test]
    fn unsupported_year_is_reported_as_such() {
        assert_eq!(validate_iso_week(999_999, 4), Err(CalendarError::YearOutOfRange(999_999)));
        assert_eq!(resolve_sunday(4, 999_999, 1), Err(CalendarError::YearOutOfRange(999_999)));
    }

    #[test]
    fn resolve_all_checks_lengths_and_reports_position() {
        let err = resolve_all(&[1, 2], &[2024], &[1, 1]).unwrap_err();
        assert!(matches!(err, CoreError::LengthMismatch { weeks: 2, years: 1, months: 2 }));

        let resolved = resolve_all(&[4, 5], &[2024, 2024], &[1, 1]).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[1].sunday_clipped, ymd(2024, 1, 31));

        let err = resolve_all(&[4, 5], &[2024, 2024], &[1, 14]).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidCalendarInput {
                line: 2,
                source: CalendarError::MonthOutOfRange(14),
            }
        );
    }
}
