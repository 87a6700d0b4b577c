//! Hebrew calendar strings and label formatting
//!
//! The UI is Hebrew/RTL with 24-hour time. All labels come from here so
//! the rendering layer never hardcodes a string.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::types::ViewMode;

/// Full weekday names, Sunday first.
pub const WEEKDAYS: [&str; 7] = [
    "ראשון", "שני", "שלישי", "רביעי", "חמישי", "שישי", "שבת",
];

/// Single-letter weekday headers for compact month grids.
pub const WEEKDAYS_SHORT: [&str; 7] = ["א׳", "ב׳", "ג׳", "ד׳", "ה׳", "ו׳", "ש׳"];

/// Gregorian month names, January first.
pub const MONTHS: [&str; 12] = [
    "ינואר", "פברואר", "מרץ", "אפריל", "מאי", "יוני", "יולי", "אוגוסט", "ספטמבר",
    "אוקטובר", "נובמבר", "דצמבר",
];

pub const MONTHS_SHORT: [&str; 12] = [
    "ינו", "פבר", "מרץ", "אפר", "מאי", "יוני", "יולי", "אוג", "ספט", "אוק", "נוב",
    "דצמ",
];

pub const MSG_ALL_DAY: &str = "כל היום";
pub const MSG_PREVIOUS: &str = "קודם";
pub const MSG_NEXT: &str = "הבא";
pub const MSG_TODAY: &str = "היום";
pub const MSG_DATE: &str = "תאריך";
pub const MSG_TIME: &str = "שעה";
pub const MSG_EVENT: &str = "אירוע";
pub const MSG_NO_EVENTS_IN_RANGE: &str = "אין אירועים בטווח זה";

/// Toolbar label for a view mode.
pub fn view_label(view: ViewMode) -> &'static str {
    match view {
        ViewMode::Month => "חודש",
        ViewMode::Week => "שבוע",
        ViewMode::Day => "יום",
        ViewMode::Agenda => "סדר יום",
    }
}

/// Hebrew name of a date's weekday.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAYS[date.weekday().num_days_from_sunday() as usize]
}

/// Column header for a date. Week view adds the day-of-month number,
/// the other views show the weekday name alone.
pub fn day_header(date: NaiveDate, view: ViewMode) -> String {
    match view {
        ViewMode::Week => format!("{} {}", weekday_name(date), date.day()),
        _ => weekday_name(date).to_string(),
    }
}

/// Compact toolbar label, "03/2024".
pub fn toolbar_label(date: NaiveDate) -> String {
    date.format("%m/%Y").to_string()
}

/// Month-view header, "מרץ 2024".
pub fn month_header(date: NaiveDate) -> String {
    format!("{} {}", MONTHS[date.month0() as usize], date.year())
}

/// 24-hour event span, "14:00 - 15:30".
pub fn time_range_label(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"))
}

/// Agenda header, "01/03/2024 - 31/03/2024".
pub fn agenda_header(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y"))
}

/// Multi-day range header, "10/03 - 16/03".
pub fn day_range_header(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", start.format("%d/%m"), end.format("%d/%m"))
}

/// Overflow label for collapsed month cells, "+3 נוספים".
pub fn show_more(hidden: usize) -> String {
    format!("+{hidden} נוספים")
}
