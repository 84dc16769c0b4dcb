//! Attendance domain model
//!
//! This module defines the AttendanceRecord type representing one patient's
//! continuous stay in an emergency department, bounded by arrival and
//! departure instants.

use super::errors::CensusError;
use super::ids::{DepartmentTypeId, SiteCode};
use super::result::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// One patient visit, as ingested from the attendance dataset
///
/// Dates and times are kept as the separate calendar-date and time-of-day
/// components the source dataset carries; the expansion engine works on the
/// (date, hour) pair rather than a combined instant.
///
/// # Examples
///
/// ```
/// use ed_census::domain::attendance::AttendanceRecord;
///
/// let record = AttendanceRecord::from_raw(
///     "RAL26",
///     "01",
///     "2024-01-01",
///     "08:15:00",
///     "2024-01-01",
///     "10:00:00",
/// ).unwrap();
/// assert_eq!(record.arrival_hour(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Site the patient attended
    pub site_code: SiteCode,

    /// ECDS department type classification
    pub department_type_id: DepartmentTypeId,

    /// Calendar date of arrival
    pub arrival_date: NaiveDate,

    /// Time of day of arrival
    pub arrival_time: NaiveTime,

    /// Calendar date of departure
    pub departure_date: NaiveDate,

    /// Time of day of departure
    pub departure_time: NaiveTime,
}

impl AttendanceRecord {
    /// Creates an AttendanceRecord from already-typed components
    pub fn new(
        site_code: SiteCode,
        department_type_id: DepartmentTypeId,
        arrival_date: NaiveDate,
        arrival_time: NaiveTime,
        departure_date: NaiveDate,
        departure_time: NaiveTime,
    ) -> Self {
        Self {
            site_code,
            department_type_id,
            arrival_date,
            arrival_time,
            departure_date,
            departure_time,
        }
    }

    /// Creates an AttendanceRecord from the raw string fields of a source row
    ///
    /// Dates are `YYYY-MM-DD`; a trailing time component on the date field
    /// (`"2024-01-01 00:00:00"`) is tolerated and ignored, as some extracts
    /// deliver datetime-typed date columns. Times are `HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Returns `CensusError::DataFormat` naming the offending field if any
    /// component cannot be parsed.
    pub fn from_raw(
        site_code: &str,
        department_type_id: &str,
        arrival_date: &str,
        arrival_time: &str,
        departure_date: &str,
        departure_time: &str,
    ) -> Result<Self> {
        let site_code = SiteCode::new(site_code).map_err(CensusError::DataFormat)?;
        let department_type_id =
            DepartmentTypeId::new(department_type_id).map_err(CensusError::DataFormat)?;

        Ok(Self {
            site_code,
            department_type_id,
            arrival_date: parse_date("arrival_date", arrival_date)?,
            arrival_time: parse_time("arrival_time", arrival_time)?,
            departure_date: parse_date("departure_date", departure_date)?,
            departure_time: parse_time("departure_time", departure_time)?,
        })
    }

    /// The arrival as a combined instant
    pub fn arrival_instant(&self) -> NaiveDateTime {
        self.arrival_date.and_time(self.arrival_time)
    }

    /// The departure as a combined instant
    pub fn departure_instant(&self) -> NaiveDateTime {
        self.departure_date.and_time(self.departure_time)
    }

    /// Hour-of-day (0-23) in which the patient arrived
    pub fn arrival_hour(&self) -> u32 {
        use chrono::Timelike;
        self.arrival_time.hour()
    }

    /// Hour-of-day (0-23) in which the patient departed
    pub fn departure_hour(&self) -> u32 {
        use chrono::Timelike;
        self.departure_time.hour()
    }

    /// Whether the patient arrived exactly at the top of the hour
    ///
    /// An on-the-hour arrival is counted as present at that hour's snapshot
    /// instant as well as an arrival during it.
    pub fn arrived_on_the_hour(&self) -> bool {
        use chrono::Timelike;
        self.arrival_time.minute() == 0 && self.arrival_time.second() == 0
    }
}

/// Parse a calendar date field, tolerating a trailing time component
fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    let date_part = value.split_whitespace().next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
        CensusError::DataFormat(format!("invalid {field} '{value}': {e}"))
    })
}

/// Parse a time-of-day field
fn parse_time(field: &str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M:%S").map_err(|e| {
        CensusError::DataFormat(format!("invalid {field} '{value}': {e}"))
    })
}
