//! Reporting window resolution
//!
//! This module turns a human-specified relative window ("14", "2 weeks",
//! "3 months", "2024-01-15 date") plus an "as of" date into the concrete
//! cutoff date the ingestion query filters on. The resolved start is always
//! snapped back to a Monday so the pipeline only ever processes complete
//! weeks; downstream aggregation and the weekly replacement rule in the
//! target store both assume this.

use crate::domain::errors::CensusError;
use crate::domain::result::Result;
use chrono::{Datelike, Duration, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// A parsed reporting window
///
/// Parsed once at the configuration boundary; the core never re-parses
/// window strings.
///
/// # Examples
///
/// ```
/// use ed_census::core::window::WindowSpec;
/// use chrono::NaiveDate;
///
/// let spec: WindowSpec = "2 weeks".parse().unwrap();
/// let reference = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
/// let start = spec.resolve(reference).unwrap();
/// assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowSpec {
    /// The last N days, inclusive of the reference date
    Days(u32),

    /// The last N weeks, inclusive of the reference date
    Weeks(u32),

    /// N whole months back from the first of the reference month
    ///
    /// Deliberately anchors to the first of the month, discarding
    /// day-of-month granularity.
    Months(u32),

    /// N calendar years back from the reference date
    Years(u32),

    /// A literal start date
    Literal(NaiveDate),
}

impl WindowSpec {
    /// Resolves the window against a reference date, yielding the start date
    ///
    /// # Errors
    ///
    /// Returns `CensusError::Configuration` if the subtraction leaves the
    /// supported calendar range.
    pub fn resolve(&self, reference: NaiveDate) -> Result<NaiveDate> {
        let out_of_range =
            || CensusError::Configuration(format!("window {self} is out of range of {reference}"));

        match *self {
            WindowSpec::Days(n) => reference
                .checked_sub_signed(Duration::days(i64::from(n) - 1))
                .ok_or_else(out_of_range),
            WindowSpec::Weeks(n) => reference
                .checked_sub_signed(Duration::days(i64::from(n) * 7 - 1))
                .ok_or_else(out_of_range),
            WindowSpec::Months(n) => reference
                .with_day(1)
                .and_then(|first| first.checked_sub_months(Months::new(n)))
                .ok_or_else(out_of_range),
            WindowSpec::Years(n) => reference
                .checked_sub_months(Months::new(n * 12))
                .ok_or_else(out_of_range),
            WindowSpec::Literal(date) => Ok(date),
        }
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowSpec::Days(n) => write!(f, "{n} days"),
            WindowSpec::Weeks(n) => write!(f, "{n} weeks"),
            WindowSpec::Months(n) => write!(f, "{n} months"),
            WindowSpec::Years(n) => write!(f, "{n} years"),
            WindowSpec::Literal(date) => write!(f, "{date} date"),
        }
    }
}

impl FromStr for WindowSpec {
    type Err = CensusError;

    /// Parses a window specification
    ///
    /// Accepted forms:
    /// - a bare integer, interpreted as days: `"14"`
    /// - `"<N> <unit>"` with unit `day`/`week`/`month`/`year`, optionally
    ///   pluralized: `"2 weeks"`
    /// - `"<YYYY-MM-DD> date"` for a literal start date
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();

        // A bare number is a day count
        if let Ok(days) = trimmed.parse::<u32>() {
            return validate_length(days).map(WindowSpec::Days);
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if tokens.len() != 2 {
            return Err(CensusError::Configuration(format!(
                "window '{s}' is not formatted correctly; expected '<N> <unit>'"
            )));
        }

        let unit = tokens[1].strip_suffix('s').unwrap_or(tokens[1]);

        if unit == "date" {
            let date = NaiveDate::parse_from_str(tokens[0], "%Y-%m-%d").map_err(|e| {
                CensusError::Configuration(format!("window date '{}' is invalid: {e}", tokens[0]))
            })?;
            return Ok(WindowSpec::Literal(date));
        }

        let count: u32 = tokens[0].parse().map_err(|_| {
            CensusError::Configuration(format!("window length '{}' is not a number", tokens[0]))
        })?;
        let count = validate_length(count)?;

        match unit {
            "day" => Ok(WindowSpec::Days(count)),
            "week" => Ok(WindowSpec::Weeks(count)),
            "month" => Ok(WindowSpec::Months(count)),
            "year" => Ok(WindowSpec::Years(count)),
            other => Err(CensusError::Configuration(format!(
                "window unit '{other}' is not supported"
            ))),
        }
    }
}

fn validate_length(n: u32) -> Result<u32> {
    if n == 0 {
        return Err(CensusError::Configuration(
            "window length must be at least 1".to_string(),
        ));
    }
    Ok(n)
}

/// Resolves the window and snaps the start back to its Monday
///
/// The snapped date is the cutoff the ingestion query filters on. Snapping
/// guarantees the processed range begins on a week boundary, which the
/// weekly replacement rule in the target store relies on.
///
/// # Examples
///
/// ```
/// use ed_census::core::window::{derive_cutoff_date, WindowSpec};
/// use chrono::NaiveDate;
///
/// let reference = NaiveDate::from_ymd_opt(2024, 3, 13).unwrap();
/// let cutoff = derive_cutoff_date(&WindowSpec::Weeks(2), reference).unwrap();
/// assert_eq!(cutoff, NaiveDate::from_ymd_opt(2024, 2, 26).unwrap());
/// ```
pub fn derive_cutoff_date(spec: &WindowSpec, reference: NaiveDate) -> Result<NaiveDate> {
    let start = spec.resolve(reference)?;
    Ok(snap_to_week_start(start))
}

/// The Monday of the week containing `date`
pub fn snap_to_week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
