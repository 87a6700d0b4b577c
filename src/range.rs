//! Visible-range calculation for the calendar view
//!
//! Only the visible window (plus a fixed buffer) is ever normalized or
//! fetched; navigating recomputes the window from the reference date and
//! view granularity. Weeks start on Sunday (Israeli convention).

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::{ViewMode, VisibleRange};

/// Compute the visible date window for a reference date and view mode.
///
/// Always returns a well-formed range (start < end) that contains the
/// reference date.
pub fn visible_range(reference: NaiveDate, view: ViewMode) -> VisibleRange {
    match view {
        ViewMode::Month => {
            // Current month plus a week of buffer on each side for the
            // edge weeks the grid renders from adjacent months.
            let start = first_of_month(reference) - Duration::days(7);
            let end = last_of_month(reference) + Duration::days(7);
            VisibleRange {
                start: day_start(start),
                end: day_end(end),
            }
        }
        ViewMode::Week => {
            let back = reference.weekday().num_days_from_sunday() as i64;
            let week_start = reference - Duration::days(back);
            VisibleRange {
                start: day_start(week_start - Duration::days(1)),
                end: day_end(week_start + Duration::days(8)),
            }
        }
        ViewMode::Day => VisibleRange {
            start: day_start(reference),
            end: day_end(reference),
        },
        ViewMode::Agenda => VisibleRange {
            start: day_start(reference),
            end: day_end(reference + Duration::days(30)),
        },
    }
}

/// The window to request from the lazy event loader: the visible range
/// padded by one calendar month on each side, as "YYYY-MM-DD" strings.
pub fn load_window(range: &VisibleRange) -> (String, String) {
    let (start_day, end_day) = range.days();
    let padded_start = start_day
        .checked_sub_months(Months::new(1))
        .unwrap_or(start_day);
    let padded_end = end_day.checked_add_months(Months::new(1)).unwrap_or(end_day);
    (
        padded_start.format("%Y-%m-%d").to_string(),
        padded_end.format("%Y-%m-%d").to_string(),
    )
}

pub(crate) fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub(crate) fn day_end(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .unwrap_or(date)
}
