//! Financial calendar mappings
//!
//! Deterministic, side-effect-free date mappings onto the UK fiscal
//! calendar (April through March) and Monday-to-Sunday reporting weeks.

use chrono::{Datelike, Duration, NaiveDate};

/// UK financial year of a date, formatted `yy-zz`
///
/// The financial year runs April to March: January through March belong to
/// the year that started the previous April.
///
/// # Examples
///
/// ```
/// use ed_census::core::calendar::financial_year;
/// use chrono::NaiveDate;
///
/// let feb = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
/// assert_eq!(financial_year(feb), "23-24");
///
/// let apr = NaiveDate::from_ymd_opt(2024, 4, 15).unwrap();
/// assert_eq!(financial_year(apr), "24-25");
/// ```
pub fn financial_year(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() <= 3 {
        format!("{}-{}", year - 2001, year - 2000)
    } else {
        format!("{}-{}", year - 2000, year - 1999)
    }
}

/// Financial month of a date: 1 = April through 12 = March
pub fn financial_month(date: NaiveDate) -> u32 {
    let month = date.month();
    if month <= 3 {
        month + 9
    } else {
        month - 3
    }
}

/// Short month name of a date, in financial-calendar order
pub fn month_name(date: NaiveDate) -> &'static str {
    match date.month() {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

/// The Monday of the week containing `date`
pub fn week_starting(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The Sunday of the week containing `date`
pub fn week_ending(date: NaiveDate) -> NaiveDate {
    week_starting(date) + Duration::days(6)
}
